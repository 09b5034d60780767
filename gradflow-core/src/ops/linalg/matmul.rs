// gradflow-core/src/ops/linalg/matmul.rs

use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::binary_inputs;
use crate::ops::view::transpose_op;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// 2-D matrix product `x @ w`.
///
/// Gradients: `gx = gy @ w^T` and `gw = x^T @ gy`.
#[derive(Debug, Default)]
pub struct MatmulOp;

impl Operation for MatmulOp {
    fn name(&self) -> &'static str {
        "Matmul"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let (x, w) = binary_inputs(xs, self.name())?;
        Ok(vec![x.matmul(w)?])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let x = ctx.input(0)?;
        let w = ctx.input(1)?;
        let gx = matmul_op(gy, &transpose_op(w)?)?;
        let gw = matmul_op(&transpose_op(x)?, gy)?;
        Ok(vec![gx, gw])
    }
}

pub fn matmul_op(x: &Variable, w: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(MatmulOp, &[x.clone(), w.clone()])
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
