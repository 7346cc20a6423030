//! Iteration-driving nodes: Points and Instance on Points.
//!
//! Both open an iteration frame on the context and set the index before
//! every inner evaluation, so index producers reached from their
//! per-iteration inputs see the current loop position.

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer};
use crate::geometry::GeoBuffer;
use crate::value::Value;

use super::euler_degrees_to_quat;

/// Point cloud: samples the position producer once per index.
struct Points {
    count: Producer,
    position: Producer,
}

impl ComputeNode for Points {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let count = self.count.eval(ctx)?.as_count();
        let mut positions = Vec::with_capacity(count * 3);

        ctx.push_index();
        for i in 0..count {
            ctx.set_index(i);
            let p = match self.position.eval(ctx) {
                Ok(value) => value.as_vector(),
                Err(err) => {
                    ctx.pop_index();
                    return Err(err);
                }
            };
            positions.extend_from_slice(&[p.x, p.y, p.z]);
        }
        ctx.pop_index();

        Ok(Value::Geometry(GeoBuffer::mesh(positions, None)))
    }
}

/// Instanced buffer sharing the base geometry's positions/index across
/// per-point translation/rotation/scale attributes.
struct InstanceOnPoints {
    points: Producer,
    instance: Producer,
    rotation: Producer,
    scale: Producer,
}

impl ComputeNode for InstanceOnPoints {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let Some(instance) = self.instance.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };
        let Some(points) = self.points.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };

        let count = points.vertex_count();
        let mut rotation = Vec::with_capacity(count * 4);
        let mut scale = Vec::with_capacity(count * 3);

        ctx.push_index();
        for i in 0..count {
            ctx.set_index(i);
            let r = self.rotation.eval(ctx);
            let s = self.scale.eval(ctx);
            let (r, s) = match (r, s) {
                (Ok(r), Ok(s)) => (r.as_vector(), s.as_vector()),
                (Err(err), _) | (_, Err(err)) => {
                    ctx.pop_index();
                    return Err(err);
                }
            };
            let q = euler_degrees_to_quat(r);
            rotation.extend_from_slice(&[q.x, q.y, q.z, q.w]);
            scale.extend_from_slice(&[s.x, s.y, s.z]);
        }
        ctx.pop_index();

        Ok(Value::Geometry(GeoBuffer {
            kind: instance.kind,
            positions: instance.positions,
            index: instance.index,
            translation: Some(points.positions),
            rotation: Some(rotation),
            scale: Some(scale),
        }))
    }
}

pub fn register(registry: &mut OpRegistry) {
    registry.register(
        "POINTS",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(Points {
                count: builder.input(node, 0)?,
                position: builder.input(node, 1)?,
            }) as Producer)
        }),
    );
    registry.register(
        "INSTANCE_ON_POINTS",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(InstanceOnPoints {
                points: builder.input(node, 0)?,
                instance: builder.input(node, 2)?,
                rotation: builder.input(node, 5)?,
                scale: builder.input(node, 6)?,
            }) as Producer)
        }),
    );
}
