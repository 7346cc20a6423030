//! Combine/Separate XYZ.

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer};
use crate::value::Value;

use super::input::VectorCombine;

/// Separate a vector into one component, chosen by the output selector
/// (0 → x, 1 → y, 2 → z).
struct SeparateXyz {
    selector: usize,
    vector: Producer,
}

impl ComputeNode for SeparateXyz {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let v = self.vector.eval(ctx)?.as_vector();
        Ok(Value::Scalar(v[self.selector.min(2)]))
    }
}

pub fn register(registry: &mut OpRegistry) {
    registry.register(
        "COMBXYZ",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(VectorCombine {
                x: builder.input(node, 0)?,
                y: builder.input(node, 1)?,
                z: builder.input(node, 2)?,
            }) as Producer)
        }),
    );
    registry.register(
        "SEPXYZ",
        Box::new(|builder, node, selector| {
            Ok(Box::new(SeparateXyz {
                selector,
                vector: builder.input(node, 0)?,
            }) as Producer)
        }),
    );
}
