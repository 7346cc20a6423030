use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    /// A node's type (or type/variant compound key) has no registered
    /// computation. Fatal for the tree being evaluated.
    #[error("no operation registered for `{key}` (node `{node}`)")]
    UnknownOperation { key: String, node: String },
    /// A link names a node that does not exist in the document.
    #[error("node `{node}` links to unknown node `{target}`")]
    DanglingLink { node: String, target: String },
    /// A socket's stored literal does not match its declared type.
    #[error("socket `{socket}` on node `{node}` holds a literal that is not a {expected}")]
    MalformedLiteral {
        node: String,
        socket: String,
        expected: &'static str,
    },
    /// An input index an operation requires is missing from the node record.
    #[error("node `{node}` is missing input socket {index}")]
    MissingSocket { node: String, index: usize },
}
