use approx::relative_eq;
use log::debug;
use thiserror::Error;

use crate::autograd::config::no_grad;
use crate::error::GradflowError;
use crate::ops::sum_op;
use crate::tensor::Tensor;
use crate::types::DType;
use crate::variable::Variable;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical grad {analytical_grad:?} != numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(GradflowError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(GradflowError),
    #[error("Variable error during intermediate calculation: {0}")]
    VariableError(GradflowError),
    #[error("Unsupported data type for gradient check: expected F64, got {0:?}")]
    UnsupportedDType(DType),
    #[error("Input {input_index} has no gradient after the backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Gradient check input must be a leaf variable (no producer). Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
}

impl From<GradflowError> for GradCheckError {
    fn from(err: GradflowError) -> Self {
        GradCheckError::VariableError(err)
    }
}

/// Step and tolerances of [`check_grad`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    /// Central-difference step.
    pub epsilon: f64,
    /// Relative tolerance between analytical and numerical gradients.
    pub rtol: f64,
    /// Absolute tolerance, used for gradients close to zero.
    pub atol: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            epsilon: 1e-4,
            rtol: 1e-3,
            atol: 1e-5,
        }
    }
}

/// Compares the gradients computed by `backward` against central finite
/// differences.
///
/// The scalar being differentiated is `sum(func(inputs))`. Every input must be
/// an f64 leaf variable. Inputs are perturbed in place (and restored) while the
/// numerical gradient is measured, with recording disabled. On success the
/// analytical gradients are left on the inputs.
pub fn check_grad<F>(func: F, inputs: &[Variable], config: &GradCheckConfig) -> Result<(), GradCheckError>
where
    F: Fn(&[Variable]) -> Result<Variable, GradflowError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        let dtype = input.dtype()?;
        if dtype != DType::F64 {
            return Err(GradCheckError::UnsupportedDType(dtype));
        }
        input.clear_grad();
    }

    // --- Analytical gradients ---
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    let loss = sum_op(&output, None, false)?;
    loss.backward().map_err(GradCheckError::BackwardPassError)?;

    let analytical: Vec<Vec<f64>> = inputs
        .iter()
        .enumerate()
        .map(|(i, input)| -> Result<Vec<f64>, GradCheckError> {
            match input.grad() {
                Some(grad) => Ok(grad.try_data("grad_check")?.get_f64_data()?),
                None => Err(GradCheckError::MissingAnalyticalGrad { input_index: i }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    // --- Numerical gradients ---
    let _guard = no_grad();
    let eval_loss = || -> Result<f64, GradCheckError> {
        let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
        Ok(output.try_data("grad_check")?.sum_all().item()?)
    };

    for (i, input) in inputs.iter().enumerate() {
        let original = input.try_data("grad_check")?;
        let shape = original.shape();
        let original_data = original.get_f64_data()?;

        for elem_idx in 0..original_data.len() {
            let mut perturbed = original_data.clone();

            perturbed[elem_idx] = original_data[elem_idx] + config.epsilon;
            input.set_data(Tensor::new_f64(perturbed.clone(), shape.clone())?)?;
            let loss_plus = eval_loss();

            perturbed[elem_idx] = original_data[elem_idx] - config.epsilon;
            input.set_data(Tensor::new_f64(perturbed, shape.clone())?)?;
            let loss_minus = eval_loss();

            input.set_data(original.clone())?;
            let (loss_plus, loss_minus) = (loss_plus?, loss_minus?);

            let numerical = (loss_plus - loss_minus) / (2.0 * config.epsilon);
            if !numerical.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }

            let analytical_grad = analytical[i][elem_idx];
            if !relative_eq!(
                analytical_grad,
                numerical,
                epsilon = config.atol,
                max_relative = config.rtol
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad: numerical,
                    difference: (analytical_grad - numerical).abs(),
                });
            }
        }
        debug!("grad_check: input {} ({} elements) passed", i, original_data.len());
    }
    Ok(())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
