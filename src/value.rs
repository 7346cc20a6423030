//! Value — the typed result of evaluating a computation node.

use glam::Vec3;

use crate::geometry::GeoBuffer;

/// The value produced by evaluating a node's output.
///
/// `Nothing` is the "no geometry / unconnected" value: operations that
/// structurally require geometry and receive `Nothing` return `Nothing`
/// themselves instead of failing the evaluation.
#[derive(Clone, Debug)]
pub enum Value {
    /// Single floating-point number.
    Scalar(f32),
    /// Boolean.
    Boolean(bool),
    /// 3D vector.
    Vector(Vec3),
    /// Geometry buffer (mesh or curve, possibly instanced).
    Geometry(GeoBuffer),
    /// Absent value.
    Nothing,
}

impl Value {
    /// Extract as scalar. Booleans coerce to 0/1; anything else is 0.
    pub fn as_scalar(&self) -> f32 {
        match self {
            Value::Scalar(v) => *v,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    /// Extract as a non-negative integer count (floored, clamped at 0).
    pub fn as_count(&self) -> usize {
        self.as_scalar().max(0.0) as usize
    }

    /// Extract as boolean. Scalars coerce through != 0.
    pub fn as_boolean(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Scalar(v) => *v != 0.0,
            _ => false,
        }
    }

    /// Extract as vector. Scalars splat; anything else is zero.
    pub fn as_vector(&self) -> Vec3 {
        match self {
            Value::Vector(v) => *v,
            Value::Scalar(s) => Vec3::splat(*s),
            _ => Vec3::ZERO,
        }
    }

    /// Extract as geometry, mapping every non-geometry value to `None`.
    pub fn into_geometry(self) -> Option<GeoBuffer> {
        match self {
            Value::Geometry(g) => Some(g),
            _ => None,
        }
    }

    /// Wrap an optional buffer, mapping `None` to `Nothing`.
    pub fn from_geometry(geometry: Option<GeoBuffer>) -> Self {
        match geometry {
            Some(g) => Value::Geometry(g),
            None => Value::Nothing,
        }
    }
}
