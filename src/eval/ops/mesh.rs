//! Mesh primitive nodes.

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer};
use crate::geometry::primitives;
use crate::value::Value;

struct CubeNode {
    size: Producer,
    subdivisions: [Producer; 3],
}

impl ComputeNode for CubeNode {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let size = self.size.eval(ctx)?.as_vector();
        let sx = self.subdivisions[0].eval(ctx)?.as_count();
        let sy = self.subdivisions[1].eval(ctx)?.as_count();
        let sz = self.subdivisions[2].eval(ctx)?.as_count();
        Ok(Value::Geometry(primitives::cube(size, [sx, sy, sz])))
    }
}

struct CylinderNode {
    vertices: Producer,
    side_segments: Producer,
    radius: Producer,
    depth: Producer,
}

impl ComputeNode for CylinderNode {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Geometry(primitives::cylinder(
            self.vertices.eval(ctx)?.as_count(),
            self.side_segments.eval(ctx)?.as_count(),
            self.radius.eval(ctx)?.as_scalar(),
            self.depth.eval(ctx)?.as_scalar(),
        )))
    }
}

struct UvSphereNode {
    segments: Producer,
    rings: Producer,
    radius: Producer,
}

impl ComputeNode for UvSphereNode {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Geometry(primitives::uv_sphere(
            self.segments.eval(ctx)?.as_count(),
            self.rings.eval(ctx)?.as_count(),
            self.radius.eval(ctx)?.as_scalar(),
        )))
    }
}

struct GridNode {
    size_x: Producer,
    size_y: Producer,
    vertices_x: Producer,
    vertices_y: Producer,
}

impl ComputeNode for GridNode {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Geometry(primitives::grid(
            self.size_x.eval(ctx)?.as_scalar(),
            self.size_y.eval(ctx)?.as_scalar(),
            self.vertices_x.eval(ctx)?.as_count(),
            self.vertices_y.eval(ctx)?.as_count(),
        )))
    }
}

struct LineNode {
    count: Producer,
    start: Producer,
    offset: Producer,
}

impl ComputeNode for LineNode {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Geometry(primitives::line(
            self.count.eval(ctx)?.as_count(),
            self.start.eval(ctx)?.as_vector(),
            self.offset.eval(ctx)?.as_vector(),
        )))
    }
}

pub fn register(registry: &mut OpRegistry) {
    registry.register(
        "MESH_PRIMITIVE_CUBE",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(CubeNode {
                size: builder.input(node, 0)?,
                subdivisions: [
                    builder.input(node, 1)?,
                    builder.input(node, 2)?,
                    builder.input(node, 3)?,
                ],
            }) as Producer)
        }),
    );
    registry.register(
        "MESH_PRIMITIVE_CYLINDER",
        Box::new(|builder, node, _selector| {
            // Input 2 (fill segments) is accepted but has no effect; caps
            // are always a single fan, as in the original.
            Ok(Box::new(CylinderNode {
                vertices: builder.input(node, 0)?,
                side_segments: builder.input(node, 1)?,
                radius: builder.input(node, 3)?,
                depth: builder.input(node, 4)?,
            }) as Producer)
        }),
    );
    registry.register(
        "MESH_PRIMITIVE_UV_SPHERE",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(UvSphereNode {
                segments: builder.input(node, 0)?,
                rings: builder.input(node, 1)?,
                radius: builder.input(node, 2)?,
            }) as Producer)
        }),
    );
    registry.register(
        "MESH_PRIMITIVE_GRID",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(GridNode {
                size_x: builder.input(node, 0)?,
                size_y: builder.input(node, 1)?,
                vertices_x: builder.input(node, 2)?,
                vertices_y: builder.input(node, 3)?,
            }) as Producer)
        }),
    );
    registry.register(
        "MESH_PRIMITIVE_LINE",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(LineNode {
                count: builder.input(node, 0)?,
                start: builder.input(node, 2)?,
                offset: builder.input(node, 3)?,
            }) as Producer)
        }),
    );
}
