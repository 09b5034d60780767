use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::arithmetic::{mul_op, rsub_scalar};
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Element-wise hyperbolic tangent.
///
/// The backward rule reuses the forward result: `gx = gy * (1 - y^2)`. It reads
/// `y` through the weak output handle, so it fails if the output has been
/// dropped before the backward pass reaches this node.
#[derive(Debug, Default)]
pub struct TanhOp;

impl Operation for TanhOp {
    fn name(&self) -> &'static str {
        "Tanh"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.tanh()])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let y = ctx.output(0).ok_or_else(|| {
            GradflowError::InternalError("Tanh output was dropped before backward".to_string())
        })?;
        let local = rsub_scalar(&mul_op(&y, &y)?, 1.0)?;
        Ok(vec![mul_op(gy, &local)?])
    }
}

pub fn tanh_op(x: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(TanhOp, &[x.clone()])
}
