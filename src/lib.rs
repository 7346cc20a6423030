//! Procedural geometry node-graph evaluator.
//!
//! A document is a directed graph of operation nodes (math, vector
//! algebra, primitive generators, boolean/instancing/transform
//! operations) connected through typed sockets. Evaluation builds a lazy
//! compute tree from the graph's output node — resolving every input
//! socket to a producer, recursively — and runs it to produce scalars,
//! vectors, booleans, or geometry buffers.
//!
//! ```no_run
//! use geoflow::{Document, Evaluator};
//!
//! let document = Document::load(r#"[ ... ]"#)?;
//! let output = Evaluator::new().evaluate(&document);
//! if let Ok(Some(buffer)) = output.geometry {
//!     println!("{} vertices", buffer.vertex_count());
//! }
//! # Ok::<(), geoflow::GraphError>(())
//! ```

pub mod error;
pub mod eval;
pub mod geometry;
pub mod model;
pub mod value;

pub use error::GraphError;
pub use eval::{EvalOutput, Evaluator, OpRegistry};
pub use geometry::{GeoBuffer, GeoKind};
pub use model::Document;
pub use value::Value;
