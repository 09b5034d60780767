use super::*;
use crate::utils::testing::{check_tensor_near, create_test_variable};

#[test]
fn test_mul_forward() -> Result<(), GradflowError> {
    let a = create_test_variable(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_variable(vec![4.0, 5.0, 6.0], vec![3]);
    let y = mul_op(&a, &b)?;
    check_tensor_near(&y.try_data("test")?, &[3], &[4.0, 10.0, 18.0], 1e-12);
    Ok(())
}

#[test]
fn test_mul_backward() -> Result<(), GradflowError> {
    let a = Variable::from(3.0);
    let b = Variable::from(2.0);
    let y = mul_op(&a, &b)?;
    y.backward()?;
    assert_eq!(a.grad().expect("grad a missing").try_data("test")?.item()?, 2.0);
    assert_eq!(b.grad().expect("grad b missing").try_data("test")?.item()?, 3.0);
    Ok(())
}

#[test]
fn test_mul_backward_broadcast() -> Result<(), GradflowError> {
    let a = create_test_variable(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let b = create_test_variable(vec![2.0, 3.0, 4.0], vec![3]);
    let y = mul_op(&a, &b)?;
    y.backward()?;

    let ga = a.grad().expect("grad a missing").try_data("test")?;
    check_tensor_near(&ga, &[2, 3], &[2.0, 3.0, 4.0, 2.0, 3.0, 4.0], 1e-12);
    let gb = b.grad().expect("grad b missing").try_data("test")?;
    check_tensor_near(&gb, &[3], &[5.0, 7.0, 9.0], 1e-12);
    Ok(())
}

#[test]
fn test_mul_square_through_same_input() -> Result<(), GradflowError> {
    let x = Variable::from(3.0);
    let y = mul_op(&x, &x)?;
    y.backward()?;
    assert_eq!(x.grad().expect("grad missing").try_data("test")?.item()?, 6.0);
    Ok(())
}
