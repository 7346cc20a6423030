//! Evaluation engine — builds lazy compute trees from the document and
//! runs them.

mod builder;
mod context;
mod ops;
mod registry;

pub use builder::TreeBuilder;
pub use context::EvalContext;
pub use registry::{BuildFn, OpRegistry};

use crate::error::GraphError;
use crate::geometry::GeoBuffer;
use crate::model::{Document, Node};
use crate::value::Value;

/// An executable computation built for one graph node, wrapping the
/// producers resolved for its inputs.
pub trait ComputeNode {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError>;
}

/// A resolved input producer.
pub type Producer = Box<dyn ComputeNode>;

/// Result of a full document evaluation.
///
/// The output tree and the viewer tree are evaluated independently; a
/// failure in one never suppresses the other's result. `Ok(None)` means
/// the corresponding root node is absent or produced no geometry.
#[derive(Debug)]
pub struct EvalOutput {
    pub geometry: Result<Option<GeoBuffer>, GraphError>,
    pub viewer: Result<Option<GeoBuffer>, GraphError>,
}

/// Holds the operation registry and drives evaluation.
pub struct Evaluator {
    registry: OpRegistry,
}

impl Evaluator {
    /// An evaluator with the builtin operation catalogue registered.
    pub fn new() -> Self {
        Self {
            registry: OpRegistry::with_builtin_ops(),
        }
    }

    pub fn with_registry(registry: OpRegistry) -> Self {
        Self { registry }
    }

    /// Evaluate the document's output node and viewer node.
    ///
    /// Each evaluation rebuilds its compute tree from scratch; nothing is
    /// shared or memoized between the two trees or across calls.
    pub fn evaluate(&self, document: &Document) -> EvalOutput {
        log::debug!("evaluating document ({} nodes)", document.nodes.len());
        EvalOutput {
            geometry: self.evaluate_root(document, "GROUP_OUTPUT"),
            viewer: self.evaluate_root(document, "VIEWER"),
        }
    }

    fn evaluate_root(
        &self,
        document: &Document,
        root_type: &str,
    ) -> Result<Option<GeoBuffer>, GraphError> {
        let Some(root) = document.find_by_type(root_type) else {
            return Ok(None);
        };
        let producer = TreeBuilder::new(document, &self.registry).build(root, 0)?;
        let mut ctx = EvalContext::new();
        Ok(producer.eval(&mut ctx)?.into_geometry())
    }

    /// Evaluate an arbitrary node as its own root (output-selector 0).
    pub fn evaluate_node(&self, document: &Document, node: &Node) -> Result<Value, GraphError> {
        let producer = TreeBuilder::new(document, &self.registry).build(node, 0)?;
        producer.eval(&mut EvalContext::new())
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
