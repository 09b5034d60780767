use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op_single, Operation, OperationContext};
use crate::error::GradflowError;
use crate::ops::unary_input;
use crate::ops::view::{broadcast_to_op, reshape_op};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Sums over a set of axes, or over everything when no axes are given.
///
/// Backward: the gradient is first given back the reduced axes (size 1) and
/// then broadcast to the input shape.
#[derive(Debug)]
pub struct SumOp {
    axes: Option<Vec<usize>>,
    keep_dims: bool,
    x_shape: Vec<usize>,
}

impl SumOp {
    pub fn new(axes: Option<&[usize]>, keep_dims: bool) -> Self {
        SumOp {
            axes: axes.map(<[usize]>::to_vec),
            keep_dims,
            x_shape: Vec::new(),
        }
    }

    /// Shape of the output as if `keep_dims` had been set.
    fn kept_shape(&self) -> Vec<usize> {
        self.x_shape
            .iter()
            .enumerate()
            .map(|(dim, &size)| match &self.axes {
                Some(axes) if !axes.contains(&dim) => size,
                _ => 1,
            })
            .collect()
    }
}

impl Operation for SumOp {
    fn name(&self) -> &'static str {
        "Sum"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let x = unary_input(xs, self.name())?;
        self.x_shape = x.shape();
        Ok(vec![x.sum_axes(self.axes.as_deref(), self.keep_dims)?])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        let gy = reshape_op(gy, &self.kept_shape())?;
        Ok(vec![broadcast_to_op(&gy, &self.x_shape)?])
    }
}

/// Sums `x` over `axes` (all axes when `None`).
pub fn sum_op(x: &Variable, axes: Option<&[usize]>, keep_dims: bool) -> Result<Variable, GradflowError> {
    apply_op_single(SumOp::new(axes, keep_dims), &[x.clone()])
}
