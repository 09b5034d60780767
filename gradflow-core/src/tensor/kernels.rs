//! Element kernels shared by the `Tensor` methods.
//!
//! Every kernel is written once, generically over the element type, and the
//! `Tensor` methods dispatch on the `Buffer` variant.

use num_traits::{Float, NumCast};

use crate::tensor::utils::{calculate_strides, coord_to_index_broadcasted, index_to_coord};

/// A point-wise function of one element.
pub(crate) trait UnaryKernel {
    fn apply<T: Float>(&self, x: T) -> T;
}

/// A point-wise function of two elements.
pub(crate) trait BinaryKernel {
    fn apply<T: Float>(&self, a: T, b: T) -> T;
}

pub(crate) struct AddKernel;
pub(crate) struct SubKernel;
pub(crate) struct MulKernel;
pub(crate) struct DivKernel;

impl BinaryKernel for AddKernel {
    fn apply<T: Float>(&self, a: T, b: T) -> T {
        a + b
    }
}

impl BinaryKernel for SubKernel {
    fn apply<T: Float>(&self, a: T, b: T) -> T {
        a - b
    }
}

impl BinaryKernel for MulKernel {
    fn apply<T: Float>(&self, a: T, b: T) -> T {
        a * b
    }
}

impl BinaryKernel for DivKernel {
    fn apply<T: Float>(&self, a: T, b: T) -> T {
        a / b
    }
}

pub(crate) struct NegKernel;
pub(crate) struct PowfKernel(pub f64);
pub(crate) struct SinKernel;
pub(crate) struct CosKernel;
pub(crate) struct TanhKernel;
pub(crate) struct ExpKernel;
pub(crate) struct LnKernel;
pub(crate) struct FillKernel(pub f64);

impl UnaryKernel for NegKernel {
    fn apply<T: Float>(&self, x: T) -> T {
        -x
    }
}

impl UnaryKernel for PowfKernel {
    fn apply<T: Float>(&self, x: T) -> T {
        x.powf(<T as NumCast>::from(self.0).unwrap_or_else(T::nan))
    }
}

impl UnaryKernel for SinKernel {
    fn apply<T: Float>(&self, x: T) -> T {
        x.sin()
    }
}

impl UnaryKernel for CosKernel {
    fn apply<T: Float>(&self, x: T) -> T {
        x.cos()
    }
}

impl UnaryKernel for TanhKernel {
    fn apply<T: Float>(&self, x: T) -> T {
        x.tanh()
    }
}

impl UnaryKernel for ExpKernel {
    fn apply<T: Float>(&self, x: T) -> T {
        x.exp()
    }
}

impl UnaryKernel for LnKernel {
    fn apply<T: Float>(&self, x: T) -> T {
        x.ln()
    }
}

impl UnaryKernel for FillKernel {
    fn apply<T: Float>(&self, _x: T) -> T {
        <T as NumCast>::from(self.0).unwrap_or_else(T::nan)
    }
}

/// Applies `f` to every pair of elements of two broadcast-compatible inputs.
/// `output_shape` must be the broadcast of `a_shape` and `b_shape`.
pub(crate) fn broadcast_binary_kernel<T, F>(
    a: &[T],
    a_shape: &[usize],
    b: &[T],
    b_shape: &[usize],
    output_shape: &[usize],
    f: F,
) -> Vec<T>
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    // Fast path: no broadcasting needed.
    if a_shape == b_shape {
        return a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect();
    }

    let numel: usize = output_shape.iter().product();
    let output_strides = calculate_strides(output_shape);
    let a_strides = calculate_strides(a_shape);
    let b_strides = calculate_strides(b_shape);

    let mut result = Vec::with_capacity(numel);
    for i in 0..numel {
        let coord = index_to_coord(i, &output_strides, output_shape);
        let offset_a = coord_to_index_broadcasted(&coord, a_shape, &a_strides);
        let offset_b = coord_to_index_broadcasted(&coord, b_shape, &b_strides);
        result.push(f(a[offset_a], b[offset_b]));
    }
    result
}

/// Materializes `source` (of `source_shape`) at the broadcast `target_shape`.
pub(crate) fn broadcast_to_kernel<T: Copy>(
    source: &[T],
    source_shape: &[usize],
    target_shape: &[usize],
) -> Vec<T> {
    let numel: usize = target_shape.iter().product();
    let target_strides = calculate_strides(target_shape);
    let source_strides = calculate_strides(source_shape);
    (0..numel)
        .map(|i| {
            let coord = index_to_coord(i, &target_strides, target_shape);
            source[coord_to_index_broadcasted(&coord, source_shape, &source_strides)]
        })
        .collect()
}

/// Sums `data` over `axes`, returning the reduced data in keep-dims layout
/// (every reduced axis has size 1). `axes` must be valid and deduplicated.
pub(crate) fn sum_axes_kernel<T: Float>(data: &[T], shape: &[usize], axes: &[usize]) -> Vec<T> {
    let mut output_shape = shape.to_vec();
    for &axis in axes {
        output_shape[axis] = 1;
    }
    let output_numel: usize = output_shape.iter().product();
    let output_strides = calculate_strides(&output_shape);
    let input_strides = calculate_strides(shape);

    let mut result = vec![T::zero(); output_numel];
    for (i, &value) in data.iter().enumerate() {
        let coord = index_to_coord(i, &input_strides, shape);
        let mut offset = 0;
        for (dim, &c) in coord.iter().enumerate() {
            if output_shape[dim] != 1 {
                offset += c * output_strides[dim];
            }
        }
        result[offset] = result[offset] + value;
    }
    result
}

/// Reorders the axes of `data` according to `perm` (output axis `i` is input axis `perm[i]`).
pub(crate) fn permute_kernel<T: Copy>(data: &[T], shape: &[usize], perm: &[usize]) -> Vec<T> {
    let output_shape: Vec<usize> = perm.iter().map(|&p| shape[p]).collect();
    let output_strides = calculate_strides(&output_shape);
    let input_strides = calculate_strides(shape);
    let numel = data.len();

    (0..numel)
        .map(|i| {
            let out_coord = index_to_coord(i, &output_strides, &output_shape);
            let offset: usize = perm
                .iter()
                .enumerate()
                .map(|(out_dim, &in_dim)| out_coord[out_dim] * input_strides[in_dim])
                .sum();
            data[offset]
        })
        .collect()
}

/// Naive row-major `[m, k] x [k, n]` matrix product.
pub(crate) fn matmul_kernel<T: Float>(a: &[T], b: &[T], m: usize, k: usize, n: usize) -> Vec<T> {
    let mut result = vec![T::zero(); m * n];
    for i in 0..m {
        for p in 0..k {
            let a_ip = a[i * k + p];
            for j in 0..n {
                result[i * n + j] = result[i * n + j] + a_ip * b[p * n + j];
            }
        }
    }
    result
}
