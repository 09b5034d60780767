use std::sync::Arc;

use crate::error::GradflowError;
use crate::types::DType;

/// Typed element storage behind a `Tensor`.
///
/// The vectors are wrapped in `Arc` so that reshaping or cloning a tensor shares
/// the same allocation instead of copying it. A buffer is never mutated in place;
/// kernels always produce a fresh buffer.
#[derive(Debug, Clone)]
pub enum Buffer {
    /// Buffer holding f32 data.
    F32(Arc<Vec<f32>>),
    /// Buffer holding f64 data.
    F64(Arc<Vec<f64>>),
}

impl Buffer {
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::F32(_) => DType::F32,
            Buffer::F64(_) => DType::F64,
        }
    }

    /// Returns the number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Buffer::F32(data) => data.len(),
            Buffer::F64(data) => data.len(),
        }
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the elements out, widened to f64.
    pub fn to_vec_f64(&self) -> Vec<f64> {
        match self {
            Buffer::F32(data) => data.iter().map(|&x| x as f64).collect(),
            Buffer::F64(data) => data.to_vec(),
        }
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f32>>`.
    ///
    /// Returns an error if the buffer is not of type F32.
    pub fn try_get_f32(&self) -> Result<&Arc<Vec<f32>>, GradflowError> {
        match self {
            Buffer::F32(data) => Ok(data),
            other => Err(GradflowError::DataTypeMismatch {
                expected: DType::F32,
                actual: other.dtype(),
                operation: "try_get_f32".to_string(),
            }),
        }
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f64>>`.
    pub fn try_get_f64(&self) -> Result<&Arc<Vec<f64>>, GradflowError> {
        match self {
            Buffer::F64(data) => Ok(data),
            other => Err(GradflowError::DataTypeMismatch {
                expected: DType::F64,
                actual: other.dtype(),
                operation: "try_get_f64".to_string(),
            }),
        }
    }
}
