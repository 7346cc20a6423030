//! Scalar and vector arithmetic.
//!
//! Division and logarithm follow IEEE float semantics (infinity/NaN), not
//! raised errors.

use glam::Vec3;

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer};
use crate::value::Value;

/// One scalar operation over its resolved operands.
struct ScalarMath {
    apply: fn(&[f32]) -> f32,
    operands: Vec<Producer>,
}

impl ComputeNode for ScalarMath {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let mut args = [0.0f32; 3];
        for (slot, operand) in args.iter_mut().zip(&self.operands) {
            *slot = operand.eval(ctx)?.as_scalar();
        }
        Ok(Value::Scalar((self.apply)(&args[..self.operands.len()])))
    }
}

/// One component-wise vector operation.
struct VectorMath {
    apply: fn(Vec3, Vec3) -> Vec3,
    a: Producer,
    b: Producer,
}

impl ComputeNode for VectorMath {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        let a = self.a.eval(ctx)?.as_vector();
        let b = self.b.eval(ctx)?.as_vector();
        Ok(Value::Vector((self.apply)(a, b)))
    }
}

fn scalar_op(registry: &mut OpRegistry, key: &str, arity: usize, apply: fn(&[f32]) -> f32) {
    registry.register(
        key,
        Box::new(move |builder, node, _selector| {
            let operands = (0..arity)
                .map(|i| builder.input(node, i))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(ScalarMath { apply, operands }) as Producer)
        }),
    );
}

fn vector_op(registry: &mut OpRegistry, key: &str, apply: fn(Vec3, Vec3) -> Vec3) {
    registry.register(
        key,
        Box::new(move |builder, node, _selector| {
            let a = builder.input(node, 0)?;
            let b = builder.input(node, 1)?;
            Ok(Box::new(VectorMath { apply, a, b }) as Producer)
        }),
    );
}

pub fn register(registry: &mut OpRegistry) {
    scalar_op(registry, "MATH/ADD", 2, |a| a[0] + a[1]);
    scalar_op(registry, "MATH/SUBTRACT", 2, |a| a[0] - a[1]);
    scalar_op(registry, "MATH/MULTIPLY", 2, |a| a[0] * a[1]);
    scalar_op(registry, "MATH/MULTIPLY_ADD", 3, |a| a[0] * a[1] + a[2]);
    scalar_op(registry, "MATH/DIVIDE", 2, |a| a[0] / a[1]);
    scalar_op(registry, "MATH/POWER", 2, |a| a[0].powf(a[1]));
    scalar_op(registry, "MATH/LOGARITHM", 2, |a| a[0].ln() / a[1].ln());
    scalar_op(registry, "MATH/MODULO", 2, |a| a[0] % a[1]);
    scalar_op(registry, "MATH/MINIMUM", 2, |a| a[0].min(a[1]));
    scalar_op(registry, "MATH/MAXIMUM", 2, |a| a[0].max(a[1]));
    scalar_op(registry, "MATH/FLOOR", 1, |a| a[0].floor());
    scalar_op(registry, "MATH/ABSOLUTE", 1, |a| a[0].abs());
    scalar_op(registry, "MATH/EXPONENT", 1, |a| a[0].exp());
    scalar_op(registry, "MATH/SQRT", 1, |a| a[0].sqrt());
    scalar_op(registry, "MATH/INVERSE_SQRT", 1, |a| 1.0 / a[0].sqrt());
    scalar_op(registry, "MATH/COSINE", 1, |a| a[0].cos());
    scalar_op(registry, "MATH/RADIANS", 1, |a| a[0].to_radians());

    vector_op(registry, "VECT_MATH/ADD", |a, b| a + b);
    vector_op(registry, "VECT_MATH/SUBTRACT", |a, b| a - b);
    vector_op(registry, "VECT_MATH/MULTIPLY", |a, b| a * b);
    vector_op(registry, "VECT_MATH/DIVIDE", |a, b| a / b);
}
