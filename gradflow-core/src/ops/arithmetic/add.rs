// gradflow-core/src/ops/arithmetic/add.rs

use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::binary_inputs;
use crate::ops::reduction::sum_to_op;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Element-wise addition with broadcasting.
///
/// The input shapes are kept from `forward`: the upstream gradient has the
/// broadcast shape and is summed back down to each input's shape.
#[derive(Debug, Default)]
pub struct AddOp {
    x0_shape: Vec<usize>,
    x1_shape: Vec<usize>,
}

impl Operation for AddOp {
    fn name(&self) -> &'static str {
        "Add"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let (x0, x1) = binary_inputs(xs, self.name())?;
        self.x0_shape = x0.shape();
        self.x1_shape = x1.shape();
        Ok(vec![x0.add(x1)?])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let gx0 = sum_to_op(gy, &self.x0_shape)?;
        let gx1 = sum_to_op(gy, &self.x1_shape)?;
        Ok(vec![gx0, gx1])
    }
}

/// Adds two variables element-wise, broadcasting their shapes.
pub fn add_op(a: &Variable, b: &Variable) -> Result<Variable, GradflowError> {
    apply_op_single(AddOp::default(), &[a.clone(), b.clone()])
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
