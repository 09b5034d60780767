// gradflow-core/src/ops/arithmetic/pow.rs

use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::arithmetic::{mul_op, mul_scalar};
use crate::ops::unary_input;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Raises each element to a constant power fixed at construction.
///
/// Gradient: `gx = c * x^(c - 1) * gy`, built from `pow`/`mul` so that it can be
/// differentiated again.
#[derive(Debug)]
pub struct PowOp {
    exponent: f64,
}

impl PowOp {
    pub fn new(exponent: f64) -> Self {
        PowOp { exponent }
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }
}

impl Operation for PowOp {
    fn name(&self) -> &'static str {
        "Pow"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.powf(self.exponent)])
    }

    fn backward(
        &self,
        ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let x = ctx.input(0)?;
        let c = self.exponent;
        let local = mul_scalar(&pow_op(x, c - 1.0)?, c)?;
        Ok(vec![mul_op(&local, gy)?])
    }
}

/// Raises every element of `x` to the power `exponent`.
pub fn pow_op(x: &Variable, exponent: f64) -> Result<Variable, GradflowError> {
    apply_op_single(PowOp::new(exponent), &[x.clone()])
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
