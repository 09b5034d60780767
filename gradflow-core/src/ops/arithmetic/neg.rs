use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Unary negation.
#[derive(Debug, Default)]
pub struct NegOp;

impl Operation for NegOp {
    fn name(&self) -> &'static str {
        "Neg"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.neg()])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        Ok(vec![neg_op(gy)?])
    }
}

pub fn neg_op(x: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(NegOp, &[x.clone()])
}
