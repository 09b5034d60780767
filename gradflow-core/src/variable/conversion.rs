// gradflow-core/src/variable/conversion.rs

use std::any::Any;

use crate::error::GradflowError;
use crate::tensor::Tensor;
use crate::variable::Variable;

impl Variable {
    /// Wraps an arbitrary value into a variable, if its type is supported.
    ///
    /// Accepted: `Variable` (returned unchanged), `Tensor`, `Option<Tensor>`
    /// (`None` gives a variable without data), `f64`/`f32` (0-d tensors) and
    /// `Vec<f64>`/`Vec<f32>` (1-d tensors). Anything else is rejected with
    /// `GradflowError::UnsupportedType`.
    pub fn try_from_value<V: Any>(value: V) -> Result<Variable, GradflowError> {
        let boxed: Box<dyn Any> = Box::new(value);
        let boxed = match boxed.downcast::<Variable>() {
            Ok(variable) => return Ok(*variable),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Tensor>() {
            Ok(tensor) => return Ok(Variable::new(*tensor)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Option<Tensor>>() {
            Ok(tensor) => return Ok(Variable::from_option(*tensor)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<f64>() {
            Ok(value) => return Ok(Variable::from(*value)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<f32>() {
            Ok(value) => return Ok(Variable::from(*value)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Vec<f64>>() {
            Ok(values) => {
                let len = values.len();
                return Ok(Variable::new(Tensor::new_f64(*values, vec![len])?));
            }
            Err(other) => other,
        };
        if let Ok(values) = boxed.downcast::<Vec<f32>>() {
            let len = values.len();
            return Ok(Variable::new(Tensor::new(*values, vec![len])?));
        }
        Err(GradflowError::UnsupportedType {
            type_name: std::any::type_name::<V>().to_string(),
        })
    }
}

impl From<Tensor> for Variable {
    fn from(data: Tensor) -> Self {
        Variable::new(data)
    }
}

impl From<f64> for Variable {
    fn from(value: f64) -> Self {
        Variable::new(Tensor::scalar(value))
    }
}

impl From<f32> for Variable {
    fn from(value: f32) -> Self {
        Variable::new(Tensor::scalar_f32(value))
    }
}
