use serde::{Deserialize, Serialize};

/// Semantic type of a socket (Blender-style socket type tags).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocketType {
    /// Floating point scalar.
    Value,
    /// Integer.
    Int,
    /// Boolean.
    Boolean,
    /// 3D vector.
    Vector,
    /// Geometry buffer.
    Geometry,
}

/// Literal stored on a socket, used when no link feeds it.
///
/// The JSON shape depends on the socket type: a number, a bool, or a
/// three-element array. Geometry sockets carry no literal (`None`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(untagged)]
pub enum SocketValue {
    #[default]
    None,
    Boolean(bool),
    Scalar(f32),
    Vector([f32; 3]),
}

/// A directed edge endpoint stored on a socket.
///
/// On an input socket, `node`/`socket` name the producer node and its
/// output socket; on an output socket, the consumer node and its input
/// socket. `node` is the target's *name* — the enrichment pass resolves
/// names to node indices without rewriting the link itself.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Link {
    pub node: String,
    pub socket: String,
}

/// One typed port on a node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Socket {
    pub identifier: String,
    #[serde(rename = "type")]
    pub data_type: SocketType,
    #[serde(default)]
    pub value: SocketValue,
    #[serde(default)]
    pub is_multi_input: bool,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Socket {
    pub fn new(identifier: &str, data_type: SocketType) -> Self {
        Self {
            identifier: identifier.to_string(),
            data_type,
            value: SocketValue::None,
            is_multi_input: false,
            links: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: SocketValue) -> Self {
        self.value = value;
        self
    }

    pub fn multi_input(mut self) -> Self {
        self.is_multi_input = true;
        self
    }
}
