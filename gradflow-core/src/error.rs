use crate::types::DType;
use thiserror::Error;

/// Custom error type for the GradFlow framework.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum GradflowError {
    /// A value that is neither a supported buffer type nor an absent buffer was
    /// handed to a `Variable` constructor.
    #[error("Unsupported value type for a variable: {type_name}")]
    UnsupportedType { type_name: String },

    #[error("Variable holds no data (operation: {operation})")]
    MissingData { operation: String },

    #[error("Operation {operation} does not implement {stage}")]
    NotImplemented { operation: String, stage: String },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Data type mismatch for operation '{operation}': expected {expected:?}, got {actual:?}")]
    DataTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Invalid axis {axis} for tensor of rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("Incompatible shapes for matmul: {shape1:?} and {shape2:?}")]
    IncompatibleMatmul {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Internal error: {0}")]
    InternalError(String),
}
