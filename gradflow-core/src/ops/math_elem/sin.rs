use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::arithmetic::mul_op;
use crate::ops::math_elem::cos_op;
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Element-wise sine. `gx = gy * cos(x)`.
#[derive(Debug, Default)]
pub struct SinOp;

impl Operation for SinOp {
    fn name(&self) -> &'static str {
        "Sin"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.sin()])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let x = ctx.input(0)?;
        Ok(vec![mul_op(gy, &cos_op(x)?)?])
    }
}

pub fn sin_op(x: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(SinOp, &[x.clone()])
}
