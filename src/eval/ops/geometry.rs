//! Geometry operations: join, transform, bounding box, boolean, material.

use glam::Mat4;

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer};
use crate::geometry::{
    boolean_intersect, boolean_subtract, boolean_union, primitives, GeoBuffer,
};
use crate::value::Value;

use super::euler_degrees_to_quat;

/// Concatenates a sequence of geometries. Instanced inputs are realized
/// first; absent inputs are skipped; an empty remainder yields `Nothing`.
struct JoinGeometry {
    inputs: Vec<Producer>,
}

impl ComputeNode for JoinGeometry {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let mut buffers = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            if let Some(buffer) = input.eval(ctx)?.into_geometry() {
                buffers.push(buffer);
            }
        }
        Ok(Value::from_geometry(GeoBuffer::merge(buffers)))
    }
}

/// Composed translate-rotate-scale over an input geometry's positions.
struct TransformGeometry {
    geometry: Producer,
    translation: Producer,
    rotation: Producer,
    scale: Producer,
}

impl ComputeNode for TransformGeometry {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let Some(mut buffer) = self.geometry.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };
        let matrix = Mat4::from_scale_rotation_translation(
            self.scale.eval(ctx)?.as_vector(),
            euler_degrees_to_quat(self.rotation.eval(ctx)?.as_vector()),
            self.translation.eval(ctx)?.as_vector(),
        );
        buffer.apply_transform(&matrix);
        Ok(Value::Geometry(buffer))
    }
}

/// Axis-aligned bounds. Selector 0 → box mesh, 1 → min corner, 2 → max.
struct BoundingBox {
    selector: usize,
    geometry: Producer,
}

impl ComputeNode for BoundingBox {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let Some(buffer) = self.geometry.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };
        let Some((min, max)) = buffer.bounds() else {
            return Ok(Value::Nothing);
        };
        Ok(match self.selector {
            1 => Value::Vector(min),
            2 => Value::Vector(max),
            _ => Value::Geometry(primitives::box_between(min, max)),
        })
    }
}

#[derive(Clone, Copy)]
enum BooleanOp {
    Union,
    Difference,
    Intersect,
}

/// Folds a primary mesh with each secondary mesh pairwise. Instanced
/// inputs are realized before the CSG pass.
struct MeshBoolean {
    op: BooleanOp,
    primary: Producer,
    secondaries: Vec<Producer>,
}

impl ComputeNode for MeshBoolean {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let Some(primary) = self.primary.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };
        let mut result = primary.realize_instances();
        for secondary in &self.secondaries {
            let Some(other) = secondary.eval(ctx)?.into_geometry() else {
                continue;
            };
            let other = other.realize_instances();
            result = match self.op {
                BooleanOp::Union => boolean_union(&result, &other),
                BooleanOp::Difference => boolean_subtract(&result, &other),
                BooleanOp::Intersect => boolean_intersect(&result, &other),
            };
        }
        Ok(Value::Geometry(result))
    }
}

fn mesh_boolean(registry: &mut OpRegistry, key: &str, op: BooleanOp) {
    registry.register(
        key,
        Box::new(move |builder, node, _selector| {
            Ok(Box::new(MeshBoolean {
                op,
                primary: builder.input(node, 0)?,
                secondaries: builder.multi_input(node, 1)?,
            }) as Producer)
        }),
    );
}

pub fn register(registry: &mut OpRegistry) {
    registry.register(
        "JOIN_GEOMETRY",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(JoinGeometry {
                inputs: builder.multi_input(node, 0)?,
            }) as Producer)
        }),
    );
    registry.register(
        "TRANSFORM_GEOMETRY",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(TransformGeometry {
                geometry: builder.input(node, 0)?,
                translation: builder.input(node, 1)?,
                rotation: builder.input(node, 2)?,
                scale: builder.input(node, 3)?,
            }) as Producer)
        }),
    );
    registry.register(
        "BOUNDING_BOX",
        Box::new(|builder, node, selector| {
            Ok(Box::new(BoundingBox {
                selector,
                geometry: builder.input(node, 0)?,
            }) as Producer)
        }),
    );
    mesh_boolean(registry, "MESH_BOOLEAN/UNION", BooleanOp::Union);
    mesh_boolean(registry, "MESH_BOOLEAN/DIFFERENCE", BooleanOp::Difference);
    mesh_boolean(registry, "MESH_BOOLEAN/INTERSECT", BooleanOp::Intersect);

    // Material assignment is out of scope; the node is a transparent
    // pass-through to its geometry input.
    registry.register(
        "SET_MATERIAL",
        Box::new(|builder, node, _selector| builder.input(node, 0)),
    );
}
