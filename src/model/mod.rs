//! Document model — nodes, sockets, links, and the enrichment pass.

mod document;
mod node;
mod socket;

pub use document::Document;
pub use node::Node;
pub use socket::{Link, Socket, SocketType, SocketValue};
