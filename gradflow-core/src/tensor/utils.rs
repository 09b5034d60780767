use std::cmp::max;

/// Calculates the strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data array
/// to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy broadcasting rules:
/// 1. If the shapes have different numbers of dimensions, prepend 1s to the shorter shape.
/// 2. Compare dimensions element-wise from right to left.
/// 3. Dimensions are compatible if they are equal, or one of them is 1.
/// 4. The resulting dimension size is the maximum of the two compared dimensions.
///
/// Returns `Ok(broadcasted_shape)` if the shapes are compatible, `Err(String)` otherwise.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, String> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = if i < rank_a { shape_a[rank_a - 1 - i] } else { 1 };
        let dim_b = if i < rank_b { shape_b[rank_b - 1 - i] } else { 1 };

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(format!(
                "Shapes {:?} and {:?} are not broadcastable: dimension size mismatch at index {} ({} vs {})",
                shape_a,
                shape_b,
                max_rank - 1 - i,
                dim_a,
                dim_b
            ));
        };
    }
    Ok(result_shape)
}

/// Converts a linear (row-major) index into multi-dimensional coordinates.
pub fn index_to_coord(index: usize, strides: &[usize], shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut current_index = index;
    for i in 0..shape.len() {
        if strides[i] != 0 {
            coord[i] = current_index / strides[i];
            current_index %= strides[i];
        }
    }
    coord
}

/// Maps coordinates of a broadcasted output back to the flat index of an
/// original (smaller) input. Dimensions of size 1 in the input always read index 0.
pub fn coord_to_index_broadcasted(
    target_coord: &[usize],
    original_shape: &[usize],
    original_strides: &[usize],
) -> usize {
    let rank_diff = target_coord.len().saturating_sub(original_shape.len());
    let mut index = 0;
    for i in 0..original_shape.len() {
        let effective_coord = if original_shape[i] == 1 {
            0
        } else {
            target_coord[rank_diff + i]
        };
        index += effective_coord * original_strides[i];
    }
    index
}

/// Axes along which a gradient of shape `grad_shape` must be summed to
/// recover `target_shape`, with `keep_dims` semantics.
///
/// The leading `grad_shape.len() - target_shape.len()` axes are always summed; the
/// remaining axes are summed wherever the target dimension is 1. Returns `None`
/// if `target_shape` has more dimensions than `grad_shape` or a dimension that
/// is neither 1 nor equal to the gradient's.
pub fn sum_to_axes(grad_shape: &[usize], target_shape: &[usize]) -> Option<Vec<usize>> {
    if target_shape.len() > grad_shape.len() {
        return None;
    }
    let lead = grad_shape.len() - target_shape.len();
    let mut axes: Vec<usize> = (0..lead).collect();
    for (i, &target_dim) in target_shape.iter().enumerate() {
        let grad_dim = grad_shape[lead + i];
        if target_dim == 1 {
            if grad_dim != 1 {
                axes.push(lead + i);
            }
        } else if target_dim != grad_dim {
            return None;
        }
    }
    Some(axes)
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
