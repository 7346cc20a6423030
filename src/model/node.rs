use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::socket::Socket;

/// One operation instance in the graph.
///
/// `node_type` is an open string tag (e.g. "MATH", "MESH_PRIMITIVE_CUBE");
/// the operation registry decides whether it is known. Polymorphic types
/// carry a variant in `operation` (math nodes) or `mode` (curve nodes).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Node {
    /// Process-unique id, assigned at load time when the record has none.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Unique within a document; links reference nodes by name.
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default)]
    pub inputs: Vec<Socket>,
    #[serde(default)]
    pub outputs: Vec<Socket>,
    /// 2D canvas placement. UI-only; the evaluator tolerates its absence.
    #[serde(default)]
    pub location: [f32; 2],
}

impl Node {
    pub fn new(name: &str, node_type: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            node_type: node_type.to_string(),
            operation: None,
            mode: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            location: [0.0, 0.0],
        }
    }

    /// The variant field refining this node's type, if any.
    pub fn variant(&self) -> Option<&str> {
        self.operation.as_deref().or(self.mode.as_deref())
    }

    /// The registry key for this node: `TYPE` or `TYPE/VARIANT`.
    pub fn op_key(&self) -> String {
        match self.variant() {
            Some(v) => format!("{}/{}", self.node_type, v),
            None => self.node_type.clone(),
        }
    }
}
