//! Curve primitive and curve operation nodes.

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer};
use crate::geometry::{primitives, sweep_profile, GeoBuffer};
use crate::value::Value;

struct CurveCircle {
    resolution: Producer,
    radius: Producer,
}

impl ComputeNode for CurveCircle {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Geometry(primitives::circle(
            self.resolution.eval(ctx)?.as_count(),
            self.radius.eval(ctx)?.as_scalar(),
        )))
    }
}

struct CurveQuadrilateral {
    width: Producer,
    height: Producer,
}

impl ComputeNode for CurveQuadrilateral {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Geometry(primitives::quadrilateral(
            self.width.eval(ctx)?.as_scalar(),
            self.height.eval(ctx)?.as_scalar(),
        )))
    }
}

struct CurveToMesh {
    curve: Producer,
    profile: Producer,
}

impl ComputeNode for CurveToMesh {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let Some(curve) = self.curve.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };
        let Some(profile) = self.profile.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };
        Ok(Value::Geometry(sweep_profile(&curve, &profile)))
    }
}

/// Computes per-corner turning angles; the curve itself passes through
/// unmodified (corner insertion is not implemented).
struct FilletCurve {
    curve: Producer,
    radius: Producer,
}

impl FilletCurve {
    /// Turning angle at each vertex, from consecutive edge directions.
    fn corner_angles(curve: &GeoBuffer) -> Vec<f32> {
        let points = curve.points();
        if points.len() < 3 {
            return Vec::new();
        }
        let n = points.len();
        let directions: Vec<_> = (0..n)
            .map(|i| (points[(i + 1) % n] - points[i]).normalize_or_zero())
            .collect();
        directions
            .iter()
            .enumerate()
            .map(|(i, dir)| {
                let next = directions[(i + 1) % n];
                std::f32::consts::PI - (-*dir).angle_between(next)
            })
            .collect()
    }
}

impl ComputeNode for FilletCurve {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let Some(curve) = self.curve.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };
        let radius = self.radius.eval(ctx)?.as_scalar();
        let angles = Self::corner_angles(&curve);
        log::debug!(
            "fillet: radius {radius}, {} corners, max turn {:.3}",
            angles.len(),
            angles.iter().cloned().fold(0.0f32, f32::max)
        );
        Ok(Value::Geometry(curve))
    }
}

fn fillet(registry: &mut OpRegistry, key: &str) {
    registry.register(
        key,
        Box::new(|builder, node, _selector| {
            Ok(Box::new(FilletCurve {
                curve: builder.input(node, 0)?,
                radius: builder.input(node, 2)?,
            }) as Producer)
        }),
    );
}

pub fn register(registry: &mut OpRegistry) {
    registry.register(
        "CURVE_PRIMITIVE_CIRCLE",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(CurveCircle {
                resolution: builder.input(node, 0)?,
                radius: builder.input(node, 4)?,
            }) as Producer)
        }),
    );
    registry.register(
        "CURVE_PRIMITIVE_QUADRILATERAL",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(CurveQuadrilateral {
                width: builder.input(node, 0)?,
                height: builder.input(node, 1)?,
            }) as Producer)
        }),
    );
    registry.register(
        "CURVE_TO_MESH",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(CurveToMesh {
                curve: builder.input(node, 0)?,
                profile: builder.input(node, 1)?,
            }) as Producer)
        }),
    );
    fillet(registry, "FILLET_CURVE/BEZIER");
    fillet(registry, "FILLET_CURVE/POLY");
}
