// gradflow-core/src/tensor/create.rs

use std::sync::Arc;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::buffer::Buffer;
use crate::tensor::kernels::FillKernel;
use crate::tensor::Tensor;
use crate::types::DType;

/// Creates a new tensor filled with a specific value with the specified shape.
pub fn full(shape: &[usize], value: f64, dtype: DType) -> Tensor {
    let numel: usize = shape.iter().product();
    let buffer = match dtype {
        DType::F32 => Buffer::F32(Arc::new(vec![value as f32; numel])),
        DType::F64 => Buffer::F64(Arc::new(vec![value; numel])),
    };
    Tensor {
        buffer,
        shape: shape.to_vec(),
    }
}

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize], dtype: DType) -> Tensor {
    full(shape, 0.0, dtype)
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize], dtype: DType) -> Tensor {
    full(shape, 1.0, dtype)
}

/// Creates an f64 tensor with elements drawn uniformly from `[0, 1)`.
pub fn rand(shape: &[usize]) -> Tensor {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f64> = (0..numel).map(|_| rng.gen::<f64>()).collect();
    Tensor {
        buffer: Buffer::F64(Arc::new(data)),
        shape: shape.to_vec(),
    }
}

/// Creates an f64 tensor with elements drawn from the standard normal distribution.
pub fn randn(shape: &[usize]) -> Tensor {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f64> = (0..numel).map(|_| rng.sample(StandardNormal)).collect();
    Tensor {
        buffer: Buffer::F64(Arc::new(data)),
        shape: shape.to_vec(),
    }
}

impl Tensor {
    /// A tensor of the same shape and dtype, filled with `value`.
    pub fn full_like(&self, value: f64) -> Tensor {
        self.map_unary(FillKernel(value))
    }

    pub fn zeros_like(&self) -> Tensor {
        self.full_like(0.0)
    }

    pub fn ones_like(&self) -> Tensor {
        self.full_like(1.0)
    }
}
