use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::arithmetic::div_op;
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Element-wise natural logarithm. `gx = gy / x`.
///
/// Non-positive inputs follow IEEE semantics (`-inf`, `NaN`).
#[derive(Debug, Default)]
pub struct LnOp;

impl Operation for LnOp {
    fn name(&self) -> &'static str {
        "Ln"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.ln()])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        Ok(vec![div_op(gy, ctx.input(0)?)?])
    }
}

pub fn ln_op(x: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(LnOp, &[x.clone()])
}
