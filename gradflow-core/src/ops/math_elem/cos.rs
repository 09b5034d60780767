use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::arithmetic::{mul_op, neg_op};
use crate::ops::math_elem::sin_op;
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Element-wise cosine. `gx = gy * -sin(x)`.
#[derive(Debug, Default)]
pub struct CosOp;

impl Operation for CosOp {
    fn name(&self) -> &'static str {
        "Cos"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.cos()])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let x = ctx.input(0)?;
        Ok(vec![mul_op(gy, &neg_op(&sin_op(x)?)?)?])
    }
}

pub fn cos_op(x: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(CosOp, &[x.clone()])
}
