//! # Operation Library (`ops`)
//!
//! Concrete differentiable primitives built on the [`Operation`](crate::autograd::Operation)
//! contract.
//!
//! ## Structure:
//!
//! - **Submodules:** Operations are grouped logically (`arithmetic`, `math_elem`,
//!   `reduction`, `view`, `linalg`).
//! - **Operation structs:** each primitive is a struct implementing `Operation`
//!   (e.g. `AddOp`, `MatmulOp`); it stores what its backward rule needs during
//!   `forward`.
//! - **`_op` functions:** the public entry points (`add_op`, `sum_op`, ...)
//!   build the operation and run it through [`apply_op`](crate::autograd::apply_op).
//!
//! Every backward rule is expressed with these same `_op` functions, so any
//! gradient can itself be differentiated when the backward pass records.
//! Binary element-wise operations broadcast, and reduce their input gradients
//! back to the input shapes with [`sum_to_op`].

pub mod arithmetic;
pub mod linalg;
pub mod math_elem;
pub mod reduction;
pub mod view;

pub use arithmetic::{
    add_op, add_scalar, div_op, div_scalar, mul_op, mul_scalar, neg_op, pow_op, rdiv_scalar,
    rsub_scalar, sub_op, sub_scalar,
};
pub use linalg::matmul_op;
pub use math_elem::{cos_op, exp_op, ln_op, sin_op, tanh_op};
pub use reduction::{sum_op, sum_to_op};
pub use view::{broadcast_to_op, reshape_op, transpose_op};

use crate::error::GradflowError;
use crate::tensor::Tensor;

/// The input of a unary operation's forward pass.
pub(crate) fn unary_input<'a>(xs: &'a [Tensor], operation: &str) -> Result<&'a Tensor, GradflowError> {
    match xs {
        [x] => Ok(x),
        _ => Err(GradflowError::InternalError(format!(
            "{} expects 1 input, got {}",
            operation,
            xs.len()
        ))),
    }
}

/// The inputs of a binary operation's forward pass.
pub(crate) fn binary_inputs<'a>(
    xs: &'a [Tensor],
    operation: &str,
) -> Result<(&'a Tensor, &'a Tensor), GradflowError> {
    match xs {
        [x0, x1] => Ok((x0, x1)),
        _ => Err(GradflowError::InternalError(format!(
            "{} expects 2 inputs, got {}",
            operation,
            xs.len()
        ))),
    }
}
