use super::*;
use crate::autograd::no_grad;
use crate::utils::testing::{check_tensor_near, create_test_variable};

#[test]
fn test_add_forward() -> Result<(), GradflowError> {
    let a = create_test_variable(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_variable(vec![4.0, 5.0, 6.0], vec![3]);
    let y = add_op(&a, &b)?;
    check_tensor_near(&y.try_data("test")?, &[3], &[5.0, 7.0, 9.0], 1e-12);

    let node = y.producer().expect("add output should have a producer");
    assert_eq!(node.name(), "Add");
    assert_eq!(node.inputs().len(), 2);
    assert_eq!(y.generation(), 1);
    Ok(())
}

#[test]
fn test_add_backward_simple() -> Result<(), GradflowError> {
    let a = create_test_variable(vec![2.0, 3.0], vec![2]);
    let b = create_test_variable(vec![4.0, 5.0], vec![2]);
    let y = add_op(&a, &b)?;
    y.backward()?;

    let ga = a.grad().expect("grad a missing").try_data("test")?;
    let gb = b.grad().expect("grad b missing").try_data("test")?;
    check_tensor_near(&ga, &[2], &[1.0, 1.0], 1e-12);
    check_tensor_near(&gb, &[2], &[1.0, 1.0], 1e-12);
    Ok(())
}

#[test]
fn test_add_same_input_twice_accumulates() -> Result<(), GradflowError> {
    let x = Variable::from(3.0);
    let y = add_op(&x, &x)?;
    y.backward()?;
    let gx = x.grad().expect("grad missing").try_data("test")?;
    assert_eq!(gx.item()?, 2.0);
    Ok(())
}

#[test]
fn test_add_backward_broadcast() -> Result<(), GradflowError> {
    let a = create_test_variable(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let b = create_test_variable(vec![10.0], vec![1]);
    let y = add_op(&a, &b)?;
    check_tensor_near(
        &y.try_data("test")?,
        &[2, 3],
        &[11.0, 12.0, 13.0, 14.0, 15.0, 16.0],
        1e-12,
    );

    y.backward()?;
    let ga = a.grad().expect("grad a missing").try_data("test")?;
    check_tensor_near(&ga, &[2, 3], &[1.0; 6], 1e-12);
    let gb = b.grad().expect("grad b missing").try_data("test")?;
    check_tensor_near(&gb, &[1], &[6.0], 1e-12);
    Ok(())
}

#[test]
fn test_add_incompatible_shapes() {
    let a = create_test_variable(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_variable(vec![1.0, 2.0], vec![2]);
    let result = add_op(&a, &b);
    assert!(matches!(result, Err(GradflowError::BroadcastError { .. })));
}

#[test]
fn test_add_missing_data() {
    let a = Variable::empty();
    let b = Variable::from(1.0);
    let result = add_op(&a, &b);
    assert!(matches!(result, Err(GradflowError::MissingData { .. })));
}

#[test]
fn test_add_without_recording_is_a_leaf() -> Result<(), GradflowError> {
    let a = Variable::from(1.0);
    let b = Variable::from(2.0);
    let y = {
        let _guard = no_grad();
        add_op(&a, &b)?
    };
    assert!(y.is_leaf());
    assert_eq!(y.generation(), 0);
    assert_eq!(y.try_data("test")?.item()?, 3.0);
    Ok(())
}
