use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::reduction::sum_to_op;
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Repeats `x` along broadcast axes. Adjoint of [`sum_to_op`].
#[derive(Debug)]
pub struct BroadcastToOp {
    shape: Vec<usize>,
    x_shape: Vec<usize>,
}

impl BroadcastToOp {
    pub fn new(shape: &[usize]) -> Self {
        BroadcastToOp {
            shape: shape.to_vec(),
            x_shape: Vec::new(),
        }
    }
}

impl Operation for BroadcastToOp {
    fn name(&self) -> &'static str {
        "BroadcastTo"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let x = unary_input(xs, self.name())?;
        self.x_shape = x.shape();
        Ok(vec![x.broadcast_to(&self.shape)?])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        Ok(vec![sum_to_op(gy, &self.x_shape)?])
    }
}

/// Broadcasts `x` to `shape`. Returns `x` itself when the shape already matches.
pub fn broadcast_to_op(x: &Variable, shape: &[usize]) -> Result<Variable, GradflowError> {
    if x.shape()? == shape {
        return Ok(x.clone());
    }
    apply_op_single(BroadcastToOp::new(shape), &[x.clone()])
}
