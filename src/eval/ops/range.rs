//! Map Range — linear remap without clamping.

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer};
use crate::value::Value;

/// Values outside the source range extrapolate.
struct MapRange {
    value: Producer,
    from_min: Producer,
    from_max: Producer,
    to_min: Producer,
    to_max: Producer,
}

impl ComputeNode for MapRange {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let value = self.value.eval(ctx)?.as_scalar();
        let from_min = self.from_min.eval(ctx)?.as_scalar();
        let from_max = self.from_max.eval(ctx)?.as_scalar();
        let to_min = self.to_min.eval(ctx)?.as_scalar();
        let to_max = self.to_max.eval(ctx)?.as_scalar();

        let factor = (value - from_min) / (from_max - from_min);
        Ok(Value::Scalar(to_min + factor * (to_max - to_min)))
    }
}

pub fn register(registry: &mut OpRegistry) {
    registry.register(
        "MAP_RANGE",
        Box::new(|builder, node, _selector| {
            Ok(Box::new(MapRange {
                value: builder.input(node, 0)?,
                from_min: builder.input(node, 1)?,
                from_max: builder.input(node, 2)?,
                to_min: builder.input(node, 3)?,
                to_max: builder.input(node, 4)?,
            }) as Producer)
        }),
    );
}
