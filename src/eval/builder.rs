//! Compute-tree builder — resolves each input socket to a producer,
//! recursively.

use super::ops::input::{BooleanConstant, NothingConstant, ScalarConstant, VectorCombine};
use super::registry::OpRegistry;
use super::Producer;
use crate::error::GraphError;
use crate::model::{Document, Link, Node, Socket, SocketType, SocketValue};

/// Resolves nodes into ready-to-evaluate computation trees.
///
/// Resolution is whole-node and lazy: building a producer for one output
/// resolves producers for every input of that node, each of which
/// recursively builds its own subtree. There is no memoization — a node
/// feeding N consumers is resolved (and later evaluated) N times.
pub struct TreeBuilder<'a> {
    document: &'a Document,
    registry: &'a OpRegistry,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(document: &'a Document, registry: &'a OpRegistry) -> Self {
        Self { document, registry }
    }

    /// Build the computation for `node`, selecting its `selector`-th output.
    pub fn build(&self, node: &Node, selector: usize) -> Result<Producer, GraphError> {
        let build_fn = self.registry.lookup(node)?;
        build_fn(self, node, selector)
    }

    /// Resolve a single-input socket to one producer: the linked output if
    /// a link exists, otherwise a constant synthesized from the socket's
    /// literal.
    pub fn input(&self, node: &Node, index: usize) -> Result<Producer, GraphError> {
        let socket = self.socket(node, index)?;
        match socket.links.first() {
            Some(link) => self.resolve_link(node, link),
            None => self.constant(node, socket),
        }
    }

    /// Resolve a multi-input socket to an ordered producer sequence
    /// (possibly empty).
    pub fn multi_input(&self, node: &Node, index: usize) -> Result<Vec<Producer>, GraphError> {
        let socket = self.socket(node, index)?;
        socket
            .links
            .iter()
            .map(|link| self.resolve_link(node, link))
            .collect()
    }

    fn socket<'n>(&self, node: &'n Node, index: usize) -> Result<&'n Socket, GraphError> {
        node.inputs.get(index).ok_or_else(|| GraphError::MissingSocket {
            node: node.name.clone(),
            index,
        })
    }

    fn resolve_link(&self, node: &Node, link: &Link) -> Result<Producer, GraphError> {
        let upstream =
            self.document
                .node_by_name(&link.node)
                .ok_or_else(|| GraphError::DanglingLink {
                    node: node.name.clone(),
                    target: link.node.clone(),
                })?;
        let selector = upstream
            .outputs
            .iter()
            .position(|out| out.identifier == link.socket)
            .unwrap_or(0);
        self.build(upstream, selector)
    }

    /// Synthesize a constant producer from an unlinked socket's literal.
    fn constant(&self, node: &Node, socket: &Socket) -> Result<Producer, GraphError> {
        let malformed = || GraphError::MalformedLiteral {
            node: node.name.clone(),
            socket: socket.identifier.clone(),
            expected: match socket.data_type {
                SocketType::Vector => "vector",
                SocketType::Boolean => "boolean",
                _ => "number",
            },
        };

        match socket.data_type {
            SocketType::Vector => match socket.value {
                // Three independent scalar constants, combined.
                SocketValue::Vector([x, y, z]) => Ok(Box::new(VectorCombine {
                    x: Box::new(ScalarConstant(x)),
                    y: Box::new(ScalarConstant(y)),
                    z: Box::new(ScalarConstant(z)),
                })),
                SocketValue::None => Ok(Box::new(VectorCombine {
                    x: Box::new(ScalarConstant(0.0)),
                    y: Box::new(ScalarConstant(0.0)),
                    z: Box::new(ScalarConstant(0.0)),
                })),
                _ => Err(malformed()),
            },
            SocketType::Boolean => match socket.value {
                SocketValue::Boolean(b) => Ok(Box::new(BooleanConstant(b))),
                SocketValue::None => Ok(Box::new(BooleanConstant(false))),
                _ => Err(malformed()),
            },
            SocketType::Value | SocketType::Int => match socket.value {
                SocketValue::Scalar(v) => Ok(Box::new(ScalarConstant(v))),
                SocketValue::None => Ok(Box::new(ScalarConstant(0.0))),
                _ => Err(malformed()),
            },
            // Geometry has no literal form; unlinked means absent.
            SocketType::Geometry => Ok(Box::new(NothingConstant)),
        }
    }
}
