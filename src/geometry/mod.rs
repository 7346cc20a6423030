//! Geometry buffers and the mesh algorithms behind the geometry nodes.

mod boolean;
mod buffer;
pub mod primitives;
mod sweep;

pub use boolean::{boolean_intersect, boolean_subtract, boolean_union};
pub use buffer::{GeoBuffer, GeoKind, MeshBuilder};
pub use sweep::sweep_profile;
