// gradflow-core/src/ops/arithmetic/div.rs

use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::arithmetic::{mul_op, neg_op, pow_op};
use crate::ops::binary_inputs;
use crate::ops::reduction::sum_to_op;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Element-wise division with broadcasting.
///
/// Gradients: `gx0 = gy / x1` and `gx1 = gy * (-x0 / x1^2)`.
#[derive(Debug, Default)]
pub struct DivOp {
    x0_shape: Vec<usize>,
    x1_shape: Vec<usize>,
}

impl Operation for DivOp {
    fn name(&self) -> &'static str {
        "Div"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let (x0, x1) = binary_inputs(xs, self.name())?;
        self.x0_shape = x0.shape();
        self.x1_shape = x1.shape();
        Ok(vec![x0.div(x1)?])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let x0 = ctx.input(0)?;
        let x1 = ctx.input(1)?;

        let gx0 = div_op(gy, x1)?;
        let neg_x0_over_x1_sq = div_op(&neg_op(x0)?, &pow_op(x1, 2.0)?)?;
        let gx1 = mul_op(gy, &neg_x0_over_x1_sq)?;

        Ok(vec![
            sum_to_op(&gx0, &self.x0_shape)?,
            sum_to_op(&gx1, &self.x1_shape)?,
        ])
    }
}

pub fn div_op(a: &Variable, b: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(DivOp::default(), &[a.clone(), b.clone()])
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
