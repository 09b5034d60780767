use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Reverses the axes. Its own inverse, so the gradient is transposed back.
#[derive(Debug, Default)]
pub struct TransposeOp;

impl Operation for TransposeOp {
    fn name(&self) -> &'static str {
        "Transpose"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.transpose()])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        Ok(vec![transpose_op(gy)?])
    }
}

pub fn transpose_op(x: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(TransposeOp, &[x.clone()])
}
