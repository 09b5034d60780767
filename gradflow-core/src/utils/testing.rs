use crate::tensor::Tensor;
use crate::variable::Variable;

/// Checks that a tensor has the expected shape and that every element is within
/// `tolerance` of the expected value. Works for both dtypes (compared as f64).
/// Panics on the first mismatch.
pub fn check_tensor_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data = actual.to_vec_f64();
    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance || diff.is_nan() {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Helper to create an f64 leaf variable for testing purposes.
pub fn create_test_variable(data: Vec<f64>, shape: Vec<usize>) -> Variable {
    Variable::new(Tensor::new_f64(data, shape).expect("Failed to create test tensor"))
}

/// Helper to create an f32 leaf variable for testing purposes.
pub fn create_test_variable_f32(data: Vec<f32>, shape: Vec<usize>) -> Variable {
    Variable::new(Tensor::new(data, shape).expect("Failed to create test tensor"))
}
