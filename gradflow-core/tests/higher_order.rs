use approx::assert_relative_eq;
use gradflow_core::{BackwardOptions, GradflowError, Tensor, Variable};

mod common;
use common::{grad_item, init_logger, item};

fn quartic(x: &Variable) -> Result<Variable, GradflowError> {
    // x^4 - 2x^2
    Ok(&x.pow(4.0)? - &(&x.pow(2.0)? * 2.0))
}

#[test]
fn test_quartic_first_and_second_derivative() -> Result<(), GradflowError> {
    init_logger();
    let x = Variable::from(2.0);
    let y = quartic(&x)?;
    y.backward_with(BackwardOptions::new().create_graph(true))?;

    let gx = x.grad().expect("first derivative");
    assert_eq!(item(&gx)?, 24.0);

    x.clear_grad();
    gx.backward()?;
    assert_eq!(grad_item(&x)?, 44.0);
    Ok(())
}

#[test]
fn test_newton_method_converges() -> Result<(), GradflowError> {
    init_logger();
    let x = Variable::from(2.0);
    for _ in 0..10 {
        let y = quartic(&x)?;
        x.clear_grad();
        y.backward_with(BackwardOptions::new().create_graph(true))?;

        let gx = x.grad().expect("first derivative");
        x.clear_grad();
        gx.backward()?;
        let gx2 = x.grad().expect("second derivative");

        let step = item(&gx)? / item(&gx2)?;
        x.set_data(Tensor::scalar(item(&x)? - step))?;
    }
    assert_relative_eq!(item(&x)?, 1.0, epsilon = 1e-10);
    Ok(())
}

#[test]
fn test_tanh_third_derivative() -> Result<(), GradflowError> {
    init_logger();
    let at = 0.5f64;
    let x = Variable::from(at);
    let y = x.tanh()?;
    y.backward_with(BackwardOptions::new().create_graph(true))?;

    let mut gx = x.grad().expect("first derivative");
    for _ in 0..2 {
        x.clear_grad();
        gx.backward_with(BackwardOptions::new().create_graph(true))?;
        gx = x.grad().expect("next derivative");
    }

    // d3/dx3 tanh = -2 (1 - t^2) (1 - 3 t^2)
    let t = at.tanh();
    let expected = -2.0 * (1.0 - t * t) * (1.0 - 3.0 * t * t);
    assert_relative_eq!(item(&gx)?, expected, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_gradient_of_gradient_norm() -> Result<(), GradflowError> {
    // z = gx^3 + y with gx = 2x, so dz/dx = 24x^2 + 2x = 100 at x = 2
    init_logger();
    let x = Variable::from(2.0);
    let y = x.pow(2.0)?;
    y.backward_with(BackwardOptions::new().create_graph(true))?;
    let gx = x.grad().expect("first derivative");
    let z = &gx.pow(3.0)? + &y;
    x.clear_grad();
    z.backward()?;
    assert_eq!(grad_item(&x)?, 100.0);
    Ok(())
}
