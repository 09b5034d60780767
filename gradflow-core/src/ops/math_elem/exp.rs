use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::arithmetic::mul_op;
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Element-wise natural exponential. `gx = gy * exp(x)`.
#[derive(Debug, Default)]
pub struct ExpOp;

impl Operation for ExpOp {
    fn name(&self) -> &'static str {
        "Exp"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.exp()])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        // Recomputed from the input; the output may already be dropped.
        let y = exp_op(ctx.input(0)?)?;
        Ok(vec![mul_op(gy, &y)?])
    }
}

pub fn exp_op(x: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(ExpOp, &[x.clone()])
}
