//! Literal producers, the iteration-index producer, and group input.

use crate::error::GraphError;
use crate::eval::registry::OpRegistry;
use crate::eval::{ComputeNode, EvalContext, Producer, TreeBuilder};
use crate::model::{Node, SocketValue};
use crate::value::Value;

/// Constant scalar.
pub struct ScalarConstant(pub f32);

impl ComputeNode for ScalarConstant {
    fn eval(&self, _ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Scalar(self.0))
    }
}

/// Constant boolean.
pub struct BooleanConstant(pub bool);

impl ComputeNode for BooleanConstant {
    fn eval(&self, _ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Boolean(self.0))
    }
}

/// Absent value (unlinked geometry input, group input geometry).
pub struct NothingConstant;

impl ComputeNode for NothingConstant {
    fn eval(&self, _ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Nothing)
    }
}

/// Vector assembled from three independent scalar producers.
pub struct VectorCombine {
    pub x: Producer,
    pub y: Producer,
    pub z: Producer,
}

impl ComputeNode for VectorCombine {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Vector(glam::Vec3::new(
            self.x.eval(ctx)?.as_scalar(),
            self.y.eval(ctx)?.as_scalar(),
            self.z.eval(ctx)?.as_scalar(),
        )))
    }
}

/// Current iteration index, read from the evaluation context.
pub struct IndexProducer;

impl ComputeNode for IndexProducer {
    fn eval(&self, ctx: &mut EvalContext) -> Result<Value, GraphError> {
        Ok(Value::Scalar(ctx.index() as f32))
    }
}

/// Producer for the literal stored on an output socket (VALUE, BOOLEAN,
/// INPUT_VECTOR, GROUP_INPUT nodes read their own outputs directly).
fn output_literal(node: &Node, selector: usize) -> Result<Producer, GraphError> {
    let value = node
        .outputs
        .get(selector)
        .map(|socket| socket.value.clone())
        .unwrap_or_default();
    Ok(match value {
        SocketValue::Scalar(v) => Box::new(ScalarConstant(v)),
        SocketValue::Boolean(b) => Box::new(BooleanConstant(b)),
        SocketValue::Vector([x, y, z]) => Box::new(VectorCombine {
            x: Box::new(ScalarConstant(x)),
            y: Box::new(ScalarConstant(y)),
            z: Box::new(ScalarConstant(z)),
        }),
        SocketValue::None => Box::new(NothingConstant),
    })
}

pub fn register(registry: &mut OpRegistry) {
    registry.register(
        "VALUE",
        Box::new(|_builder: &TreeBuilder, node: &Node, _selector| output_literal(node, 0)),
    );
    registry.register(
        "BOOLEAN",
        Box::new(|_builder: &TreeBuilder, node: &Node, _selector| output_literal(node, 0)),
    );
    registry.register(
        "INPUT_VECTOR",
        Box::new(|_builder: &TreeBuilder, node: &Node, _selector| output_literal(node, 0)),
    );
    registry.register(
        "GROUP_INPUT",
        Box::new(|_builder: &TreeBuilder, node: &Node, selector| output_literal(node, selector)),
    );
    registry.register(
        "INDEX",
        Box::new(|_builder, _node, _selector| Ok(Box::new(IndexProducer) as Producer)),
    );
}
