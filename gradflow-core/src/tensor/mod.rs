// gradflow-core/src/tensor/mod.rs

use std::fmt;
use std::sync::Arc;

use crate::buffer::Buffer;
use crate::error::GradflowError;
use crate::types::DType;

use kernels::{BinaryKernel, UnaryKernel};

mod arithmetic_methods;
pub mod create;
pub(crate) mod kernels;
mod linalg_methods;
mod reduction_methods;
mod shape_methods;
pub mod utils;

pub use create::{full, ones, rand, randn, zeros};

/// A dense, row-major, multi-dimensional array of floats.
///
/// `Tensor` is the raw numeric buffer underneath a `Variable`. Its shape never
/// changes after creation and its elements are never modified in place: every
/// method returns a new tensor. The element storage is shared through `Arc`,
/// so cloning is cheap.
#[derive(Debug, Clone)]
pub struct Tensor {
    pub(crate) buffer: Buffer,
    pub(crate) shape: Vec<usize>,
}

impl Tensor {
    /// Creates a new f32 tensor with the given data and shape.
    ///
    /// # Errors
    /// Returns `GradflowError::TensorCreationError` if the length of `data_vec` does
    /// not match the number of elements described by `shape`.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, GradflowError> {
        Self::from_buffer(Buffer::F32(Arc::new(data_vec)), shape)
    }

    /// Creates a new f64 tensor with the given data and shape.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, GradflowError> {
        Self::from_buffer(Buffer::F64(Arc::new(data_vec)), shape)
    }

    pub(crate) fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Result<Self, GradflowError> {
        let numel: usize = shape.iter().product();
        if buffer.len() != numel {
            return Err(GradflowError::TensorCreationError {
                data_len: buffer.len(),
                shape,
            });
        }
        Ok(Tensor { buffer, shape })
    }

    /// Creates a 0-dimensional f64 tensor.
    pub fn scalar(value: f64) -> Self {
        Tensor {
            buffer: Buffer::F64(Arc::new(vec![value])),
            shape: vec![],
        }
    }

    /// Creates a 0-dimensional f32 tensor.
    pub fn scalar_f32(value: f32) -> Self {
        Tensor {
            buffer: Buffer::F32(Arc::new(vec![value])),
            shape: vec![],
        }
    }

    /// Creates a 0-dimensional tensor of the requested data type.
    pub fn scalar_of(value: f64, dtype: DType) -> Self {
        match dtype {
            DType::F32 => Tensor::scalar_f32(value as f32),
            DType::F64 => Tensor::scalar(value),
        }
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    /// Returns the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the data type (`DType`) of the tensor elements.
    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Copies the elements out (row-major), widened to f64.
    pub fn to_vec_f64(&self) -> Vec<f64> {
        self.buffer.to_vec_f64()
    }

    /// Attempts to get the tensor data as a `Vec<f32>`.
    /// Returns an error if the tensor is not F32.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, GradflowError> {
        Ok(self.buffer.try_get_f32()?.to_vec())
    }

    /// Attempts to get the tensor data as a `Vec<f64>`.
    pub fn get_f64_data(&self) -> Result<Vec<f64>, GradflowError> {
        Ok(self.buffer.try_get_f64()?.to_vec())
    }

    /// Returns the single element of a one-element tensor, as f64.
    pub fn item(&self) -> Result<f64, GradflowError> {
        if self.numel() != 1 {
            return Err(GradflowError::ShapeMismatch {
                expected: vec![],
                actual: self.shape(),
                operation: "item".to_string(),
            });
        }
        Ok(self.to_vec_f64()[0])
    }

    /// Checks a binary operation's operands share a data type.
    pub(crate) fn check_same_dtype(&self, other: &Tensor, operation: &str) -> Result<(), GradflowError> {
        if self.dtype() != other.dtype() {
            return Err(GradflowError::DataTypeMismatch {
                expected: self.dtype(),
                actual: other.dtype(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn map_unary<K: UnaryKernel>(&self, kernel: K) -> Tensor {
        let buffer = match &self.buffer {
            Buffer::F32(data) => Buffer::F32(Arc::new(data.iter().map(|&x| kernel.apply(x)).collect())),
            Buffer::F64(data) => Buffer::F64(Arc::new(data.iter().map(|&x| kernel.apply(x)).collect())),
        };
        Tensor {
            buffer,
            shape: self.shape.clone(),
        }
    }

    pub(crate) fn zip_broadcast<K: BinaryKernel>(
        &self,
        other: &Tensor,
        kernel: K,
        operation: &str,
    ) -> Result<Tensor, GradflowError> {
        self.check_same_dtype(other, operation)?;
        let output_shape = utils::broadcast_shapes(&self.shape, &other.shape).map_err(|_| {
            GradflowError::BroadcastError {
                shape1: self.shape(),
                shape2: other.shape(),
            }
        })?;

        let buffer = match (&self.buffer, &other.buffer) {
            (Buffer::F32(a), Buffer::F32(b)) => Buffer::F32(Arc::new(kernels::broadcast_binary_kernel(
                a,
                &self.shape,
                b,
                &other.shape,
                &output_shape,
                |x, y| kernel.apply(x, y),
            ))),
            (Buffer::F64(a), Buffer::F64(b)) => Buffer::F64(Arc::new(kernels::broadcast_binary_kernel(
                a,
                &self.shape,
                b,
                &other.shape,
                &output_shape,
                |x, y| kernel.apply(x, y),
            ))),
            _ => {
                return Err(GradflowError::InternalError(format!(
                    "dtype check passed but buffers differ in {}",
                    operation
                )))
            }
        };
        Ok(Tensor {
            buffer,
            shape: output_shape,
        })
    }
}

fn fmt_nested(f: &mut fmt::Formatter<'_>, data: &[f64], shape: &[usize]) -> fmt::Result {
    match shape.split_first() {
        None => write!(f, "{}", data[0]),
        Some((&dim, rest)) => {
            let chunk: usize = rest.iter().product();
            write!(f, "[")?;
            for i in 0..dim {
                if i > 0 {
                    write!(f, ", ")?;
                }
                fmt_nested(f, &data[i * chunk..(i + 1) * chunk], rest)?;
            }
            write!(f, "]")
        }
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nested(f, &self.to_vec_f64(), &self.shape)
    }
}
