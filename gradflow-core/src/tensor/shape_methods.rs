// gradflow-core/src/tensor/shape_methods.rs

use std::sync::Arc;

use crate::buffer::Buffer;
use crate::error::GradflowError;
use crate::tensor::kernels::{broadcast_to_kernel, permute_kernel};
use crate::tensor::utils::broadcast_shapes;
use crate::tensor::Tensor;

impl Tensor {
    /// Returns a tensor with the same elements and a new shape.
    /// The buffer is shared, not copied.
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Tensor, GradflowError> {
        let numel: usize = new_shape.iter().product();
        if numel != self.numel() {
            return Err(GradflowError::ShapeMismatch {
                expected: self.shape(),
                actual: new_shape.to_vec(),
                operation: "reshape".to_string(),
            });
        }
        Ok(Tensor {
            buffer: self.buffer.clone(),
            shape: new_shape.to_vec(),
        })
    }

    /// Reorders the axes: output axis `i` is input axis `axes[i]`.
    pub fn permute(&self, axes: &[usize]) -> Result<Tensor, GradflowError> {
        let rank = self.ndim();
        let mut seen = vec![false; rank];
        if axes.len() != rank {
            return Err(GradflowError::ShapeMismatch {
                expected: vec![rank],
                actual: vec![axes.len()],
                operation: "permute".to_string(),
            });
        }
        for &axis in axes {
            if axis >= rank || seen[axis] {
                return Err(GradflowError::InvalidAxis { axis, rank });
            }
            seen[axis] = true;
        }

        let buffer = match &self.buffer {
            Buffer::F32(data) => Buffer::F32(Arc::new(permute_kernel(data, &self.shape, axes))),
            Buffer::F64(data) => Buffer::F64(Arc::new(permute_kernel(data, &self.shape, axes))),
        };
        Ok(Tensor {
            buffer,
            shape: axes.iter().map(|&a| self.shape[a]).collect(),
        })
    }

    /// Reverses the order of all axes (the matrix transpose for 2-D tensors).
    pub fn transpose(&self) -> Tensor {
        if self.ndim() < 2 {
            return self.clone();
        }
        let axes: Vec<usize> = (0..self.ndim()).rev().collect();
        let buffer = match &self.buffer {
            Buffer::F32(data) => Buffer::F32(Arc::new(permute_kernel(data, &self.shape, &axes))),
            Buffer::F64(data) => Buffer::F64(Arc::new(permute_kernel(data, &self.shape, &axes))),
        };
        Tensor {
            buffer,
            shape: self.shape.iter().rev().copied().collect(),
        }
    }

    /// Materializes this tensor repeated along broadcast axes to `target_shape`.
    pub fn broadcast_to(&self, target_shape: &[usize]) -> Result<Tensor, GradflowError> {
        if self.shape == target_shape {
            return Ok(self.clone());
        }
        match broadcast_shapes(&self.shape, target_shape) {
            Ok(shape) if shape == target_shape => {}
            _ => {
                return Err(GradflowError::BroadcastError {
                    shape1: self.shape(),
                    shape2: target_shape.to_vec(),
                })
            }
        }

        let buffer = match &self.buffer {
            Buffer::F32(data) => Buffer::F32(Arc::new(broadcast_to_kernel(data, &self.shape, target_shape))),
            Buffer::F64(data) => Buffer::F64(Arc::new(broadcast_to_kernel(data, &self.shape, target_shape))),
        };
        Ok(Tensor {
            buffer,
            shape: target_shape.to_vec(),
        })
    }
}
