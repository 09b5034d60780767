use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::unary_input;
use crate::ops::view::broadcast_to_op;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Sums `x` down to a shape it could have been broadcast from.
#[derive(Debug)]
pub struct SumToOp {
    shape: Vec<usize>,
    x_shape: Vec<usize>,
}

impl SumToOp {
    pub fn new(shape: &[usize]) -> Self {
        SumToOp {
            shape: shape.to_vec(),
            x_shape: Vec::new(),
        }
    }
}

impl Operation for SumToOp {
    fn name(&self) -> &'static str {
        "SumTo"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let x = unary_input(xs, self.name())?;
        self.x_shape = x.shape();
        Ok(vec![x.sum_to(&self.shape)?])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        Ok(vec![broadcast_to_op(gy, &self.x_shape)?])
    }
}

/// Reduces `x` to `shape`. Returns `x` itself when the shape already matches,
/// which is the common case for gradients of non-broadcast binary operations.
pub fn sum_to_op(x: &Variable, shape: &[usize]) -> Result<Variable, GradflowError> {
    if x.shape()? == shape {
        return Ok(x.clone());
    }
    apply_op_single(SumToOp::new(shape), &[x.clone()])
}
