// gradflow-core/src/ops/arithmetic/scalar.rs
//
// Variable/constant arithmetic. The constant becomes a 0-d leaf of the
// variable's dtype, so it broadcasts against any shape and the regular
// binary operations (and their gradients) apply unchanged.

use crate::error::GradflowError;
use crate::ops::arithmetic::{add_op, div_op, mul_op, sub_op};
use crate::tensor::Tensor;
use crate::variable::Variable;

fn constant_like(x: &Variable, value: f64, operation: &str) -> Result<Variable, GradflowError> {
    let dtype = x.try_data(operation)?.dtype();
    Ok(Variable::new(Tensor::scalar_of(value, dtype)))
}

/// `x + c`
pub fn add_scalar(x: &Variable, c: f64) -> Result<Variable, GradflowError> {
    add_op(x, &constant_like(x, c, "add_scalar")?)
}

/// `x - c`
pub fn sub_scalar(x: &Variable, c: f64) -> Result<Variable, GradflowError> {
    sub_op(x, &constant_like(x, c, "sub_scalar")?)
}

/// `c - x`
pub fn rsub_scalar(x: &Variable, c: f64) -> Result<Variable, GradflowError> {
    sub_op(&constant_like(x, c, "rsub_scalar")?, x)
}

/// `x * c`
pub fn mul_scalar(x: &Variable, c: f64) -> Result<Variable, GradflowError> {
    mul_op(x, &constant_like(x, c, "mul_scalar")?)
}

/// `x / c`
pub fn div_scalar(x: &Variable, c: f64) -> Result<Variable, GradflowError> {
    div_op(x, &constant_like(x, c, "div_scalar")?)
}

/// `c / x`
pub fn rdiv_scalar(x: &Variable, c: f64) -> Result<Variable, GradflowError> {
    div_op(&constant_like(x, c, "rdiv_scalar")?, x)
}
