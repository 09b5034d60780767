//! A minimal reverse-mode automatic differentiation engine.
//!
//! Computations on [`Variable`]s are recorded into a graph of
//! [`OperationNode`](autograd::OperationNode)s while recording is enabled.
//! Calling [`Variable::backward`] walks that graph from the output back to the
//! leaves and leaves `d(output)/d(leaf)` in each leaf's gradient.
//!
//! ```
//! use gradflow_core::{GradflowError, Variable};
//!
//! # fn main() -> Result<(), GradflowError> {
//! let x = Variable::from(3.0);
//! let y = &x * &x + 2.0;
//! y.backward()?;
//! let gx = x.grad().expect("x has a gradient");
//! assert_eq!(gx.try_data("doc")?.item()?, 6.0);
//! # Ok(())
//! # }
//! ```

pub mod autograd;
pub mod buffer;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod types;
pub mod utils;
pub mod variable;

pub use autograd::{no_grad, using_config, BackwardOptions};
pub use error::GradflowError;
pub use tensor::Tensor;
pub use types::DType;
pub use variable::Variable;
// Re-export traits required by public functions/structs
pub use num_traits;
