use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Changes the shape while keeping the element order. The gradient is reshaped back.
#[derive(Debug)]
pub struct ReshapeOp {
    shape: Vec<usize>,
    x_shape: Vec<usize>,
}

impl ReshapeOp {
    pub fn new(shape: &[usize]) -> Self {
        ReshapeOp {
            shape: shape.to_vec(),
            x_shape: Vec::new(),
        }
    }
}

impl Operation for ReshapeOp {
    fn name(&self) -> &'static str {
        "Reshape"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let x = unary_input(xs, self.name())?;
        self.x_shape = x.shape();
        Ok(vec![x.reshape(&self.shape)?])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        Ok(vec![reshape_op(gy, &self.x_shape)?])
    }
}

/// Reshapes `x`. Returns `x` itself when the shape already matches.
pub fn reshape_op(x: &Variable, shape: &[usize]) -> Result<Variable, GradflowError> {
    if x.shape()? == shape {
        return Ok(x.clone());
    }
    apply_op_single(ReshapeOp::new(shape), &[x.clone()])
}
