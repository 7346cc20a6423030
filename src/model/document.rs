use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::node::Node;
use crate::error::GraphError;

/// The full node collection for one graph.
///
/// Serialized form is a plain JSON array of node records. After loading,
/// [`Document::enrich`] resolves every link's target name to a node index
/// and validates the endpoints; the evaluator reads the document but never
/// mutates it.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(transparent)]
pub struct Document {
    pub nodes: Vec<Node>,
    /// Node name → index, built by the enrichment pass.
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Result<Self, GraphError> {
        let mut doc = Self {
            nodes,
            by_name: HashMap::new(),
        };
        doc.enrich()?;
        Ok(doc)
    }

    /// Parse a document from its JSON form and run the enrichment pass.
    pub fn load(json_str: &str) -> Result<Self, GraphError> {
        let mut doc: Document = serde_json::from_str(json_str)?;
        doc.enrich()?;
        Ok(doc)
    }

    /// Serialize back to the persisted JSON form.
    pub fn save(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Resolve link target names to node indices and validate that every
    /// link endpoint exists. Runs once per load; idempotent.
    pub fn enrich(&mut self) -> Result<(), GraphError> {
        self.by_name = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.name.clone(), idx))
            .collect();

        for node in &self.nodes {
            for socket in node.inputs.iter().chain(node.outputs.iter()) {
                for link in &socket.links {
                    if !self.by_name.contains_key(&link.node) {
                        return Err(GraphError::DanglingLink {
                            node: node.name.clone(),
                            target: link.node.clone(),
                        });
                    }
                }
            }
        }
        log::debug!("enriched document with {} nodes", self.nodes.len());
        Ok(())
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).map(|&idx| &self.nodes[idx])
    }

    /// First node of the given type, if any.
    pub fn find_by_type(&self, node_type: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.node_type == node_type)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}
