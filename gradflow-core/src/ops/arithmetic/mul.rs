// gradflow-core/src/ops/arithmetic/mul.rs

use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::binary_inputs;
use crate::ops::reduction::sum_to_op;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Element-wise multiplication with broadcasting.
#[derive(Debug, Default)]
pub struct MulOp {
    x0_shape: Vec<usize>,
    x1_shape: Vec<usize>,
}

impl Operation for MulOp {
    fn name(&self) -> &'static str {
        "Mul"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let (x0, x1) = binary_inputs(xs, self.name())?;
        self.x0_shape = x0.shape();
        self.x1_shape = x1.shape();
        Ok(vec![x0.mul(x1)?])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let x0 = ctx.input(0)?;
        let x1 = ctx.input(1)?;
        // grad_a = grad_output * b
        let gx0 = sum_to_op(&mul_op(gy, x1)?, &self.x0_shape)?;
        // grad_b = grad_output * a
        let gx1 = sum_to_op(&mul_op(gy, x0)?, &self.x1_shape)?;
        Ok(vec![gx0, gx1])
    }
}

pub fn mul_op(a: &Variable, b: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(MulOp::default(), &[a.clone(), b.clone()])
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
