// gradflow-core/src/tensor/linalg_methods.rs

use std::sync::Arc;

use crate::buffer::Buffer;
use crate::error::GradflowError;
use crate::tensor::kernels::matmul_kernel;
use crate::tensor::Tensor;

impl Tensor {
    /// Matrix product of two 2-D tensors: `[m, k] x [k, n] -> [m, n]`.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, GradflowError> {
        self.check_same_dtype(other, "matmul")?;
        let (m, k, n) = match (self.shape.as_slice(), other.shape.as_slice()) {
            (&[m, k], &[k2, n]) if k == k2 => (m, k, n),
            _ => {
                return Err(GradflowError::IncompatibleMatmul {
                    shape1: self.shape(),
                    shape2: other.shape(),
                })
            }
        };

        let buffer = match (&self.buffer, &other.buffer) {
            (Buffer::F32(a), Buffer::F32(b)) => Buffer::F32(Arc::new(matmul_kernel(a, b, m, k, n))),
            (Buffer::F64(a), Buffer::F64(b)) => Buffer::F64(Arc::new(matmul_kernel(a, b, m, k, n))),
            _ => {
                return Err(GradflowError::InternalError(
                    "dtype check passed but buffers differ in matmul".to_string(),
                ))
            }
        };
        Ok(Tensor {
            buffer,
            shape: vec![m, n],
        })
    }
}
