// gradflow-core/src/tensor/reduction_methods.rs

use std::sync::Arc;

use crate::buffer::Buffer;
use crate::error::GradflowError;
use crate::tensor::kernels::sum_axes_kernel;
use crate::tensor::utils::sum_to_axes;
use crate::tensor::Tensor;

impl Tensor {
    /// Sums over `axes` (all axes when `None`).
    ///
    /// With `keep_dims` the reduced axes stay in the shape with size 1, otherwise
    /// they are removed. Duplicate axes are ignored.
    pub fn sum_axes(&self, axes: Option<&[usize]>, keep_dims: bool) -> Result<Tensor, GradflowError> {
        let rank = self.ndim();
        let mut axes: Vec<usize> = match axes {
            Some(axes) => axes.to_vec(),
            None => (0..rank).collect(),
        };
        axes.sort_unstable();
        axes.dedup();
        if let Some(&axis) = axes.iter().find(|&&axis| axis >= rank) {
            return Err(GradflowError::InvalidAxis { axis, rank });
        }

        let buffer = match &self.buffer {
            Buffer::F32(data) => Buffer::F32(Arc::new(sum_axes_kernel(data, &self.shape, &axes))),
            Buffer::F64(data) => Buffer::F64(Arc::new(sum_axes_kernel(data, &self.shape, &axes))),
        };
        let shape: Vec<usize> = self
            .shape
            .iter()
            .enumerate()
            .filter_map(|(dim, &size)| {
                if !axes.contains(&dim) {
                    Some(size)
                } else if keep_dims {
                    Some(1)
                } else {
                    None
                }
            })
            .collect();
        Ok(Tensor { buffer, shape })
    }

    /// Sums every element into a 0-dimensional tensor.
    pub fn sum_all(&self) -> Tensor {
        let total: f64 = self.to_vec_f64().iter().sum();
        Tensor::scalar_of(total, self.dtype())
    }

    /// Reduces this tensor to `target_shape` by summing over the axes that a
    /// broadcast from `target_shape` would have expanded.
    ///
    /// This is the inverse of `broadcast_to` and is the reduction applied to the
    /// gradients of broadcasting binary operations.
    pub fn sum_to(&self, target_shape: &[usize]) -> Result<Tensor, GradflowError> {
        if self.shape == target_shape {
            return Ok(self.clone());
        }
        let axes = sum_to_axes(&self.shape, target_shape).ok_or_else(|| GradflowError::BroadcastError {
            shape1: self.shape(),
            shape2: target_shape.to_vec(),
        })?;
        self.sum_axes(Some(&axes), true)?.reshape(target_shape)
    }
}
