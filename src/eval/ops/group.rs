//! Boundary nodes: Group Output and Viewer.

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer};
use crate::value::Value;

/// Terminal sink of the graph. Guarantees the returned buffer carries a
/// scale attribute (uniform 1.0 per vertex when upstream set none), so
/// downstream consumers can assume its presence.
struct GroupOutput {
    geometry: Producer,
}

impl ComputeNode for GroupOutput {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let Some(mut buffer) = self.geometry.eval(ctx)?.into_geometry() else {
            return Ok(Value::Nothing);
        };
        if buffer.scale.is_none() {
            buffer.scale = Some(vec![1.0; buffer.vertex_count() * 3]);
        }
        Ok(Value::Geometry(buffer))
    }
}

pub fn register(registry: &mut OpRegistry) {
    registry.register(
        "GROUP_OUTPUT",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(GroupOutput {
                geometry: builder.input(node, 0)?,
            }) as Producer)
        }),
    );
    // Inspection probe: passes its input through untouched.
    registry.register(
        "VIEWER",
        Box::new(|builder, node, _selector| builder.input(node, 0)),
    );
}
