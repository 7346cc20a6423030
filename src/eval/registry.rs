//! Operation registry — maps node type (and variant) keys to compute-node
//! constructors.

use std::collections::HashMap;

use super::builder::TreeBuilder;
use super::Producer;
use crate::error::GraphError;
use crate::model::Node;

/// Constructor for a computation node: receives the builder (to resolve
/// input producers), the node record, and the requested output selector.
pub type BuildFn =
    Box<dyn Fn(&TreeBuilder, &Node, usize) -> Result<Producer, GraphError> + Send + Sync>;

/// Registry keyed by `TYPE` for monomorphic operations and by
/// `TYPE/VARIANT` compound keys for polymorphic ones (e.g.
/// `MATH/MULTIPLY`). Lookup uses the node's own key; a miss is an
/// `UnknownOperation` error naming the node.
pub struct OpRegistry {
    builders: HashMap<String, BuildFn>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// A registry with the whole builtin operation catalogue.
    pub fn with_builtin_ops() -> Self {
        let mut registry = Self::new();
        super::ops::input::register(&mut registry);
        super::ops::math::register(&mut registry);
        super::ops::vector::register(&mut registry);
        super::ops::range::register(&mut registry);
        super::ops::curve::register(&mut registry);
        super::ops::mesh::register(&mut registry);
        super::ops::geometry::register(&mut registry);
        super::ops::points::register(&mut registry);
        super::ops::group::register(&mut registry);
        registry
    }

    pub fn register(&mut self, key: &str, build: BuildFn) {
        self.builders.insert(key.to_string(), build);
    }

    pub fn lookup(&self, node: &Node) -> Result<&BuildFn, GraphError> {
        let key = node.op_key();
        self.builders.get(&key).ok_or_else(|| {
            log::warn!("no operation registered for `{}` (node `{}`)", key, node.name);
            GraphError::UnknownOperation {
                key,
                node: node.name.clone(),
            }
        })
    }
}

impl Default for OpRegistry {
    fn default() -> Self {
        Self::with_builtin_ops()
    }
}
