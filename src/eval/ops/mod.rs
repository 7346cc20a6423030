//! Computation nodes — one module per operation category.

pub mod curve;
pub mod geometry;
pub mod group;
pub mod input;
pub mod math;
pub mod mesh;
pub mod points;
pub mod range;
pub mod vector;

use glam::{EulerRot, Quat, Vec3};

/// Rotation inputs are Euler degrees in XYZ order.
pub(crate) fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}
