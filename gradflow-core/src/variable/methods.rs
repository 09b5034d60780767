// gradflow-core/src/variable/methods.rs
//
// Method-call forms of the operation library.

use crate::error::GradflowError;
use crate::ops;
use crate::variable::Variable;

impl Variable {
    pub fn pow(&self, exponent: f64) -> Result<Variable, GradflowError> {
        ops::pow_op(self, exponent)
    }

    pub fn sin(&self) -> Result<Variable, GradflowError> {
        ops::sin_op(self)
    }

    pub fn cos(&self) -> Result<Variable, GradflowError> {
        ops::cos_op(self)
    }

    pub fn tanh(&self) -> Result<Variable, GradflowError> {
        ops::tanh_op(self)
    }

    pub fn exp(&self) -> Result<Variable, GradflowError> {
        ops::exp_op(self)
    }

    pub fn ln(&self) -> Result<Variable, GradflowError> {
        ops::ln_op(self)
    }

    pub fn reshape(&self, shape: &[usize]) -> Result<Variable, GradflowError> {
        ops::reshape_op(self, shape)
    }

    pub fn transpose(&self) -> Result<Variable, GradflowError> {
        ops::transpose_op(self)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Result<Variable, GradflowError> {
        ops::sum_op(self, None, false)
    }

    pub fn sum_axes(&self, axes: &[usize], keep_dims: bool) -> Result<Variable, GradflowError> {
        ops::sum_op(self, Some(axes), keep_dims)
    }

    pub fn sum_to(&self, shape: &[usize]) -> Result<Variable, GradflowError> {
        ops::sum_to_op(self, shape)
    }

    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Variable, GradflowError> {
        ops::broadcast_to_op(self, shape)
    }

    pub fn matmul(&self, other: &Variable) -> Result<Variable, GradflowError> {
        ops::matmul_op(self, other)
    }
}
