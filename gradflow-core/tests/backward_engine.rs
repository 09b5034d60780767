use approx::assert_relative_eq;
use gradflow_core::autograd::grad_check::{check_grad, GradCheckConfig};
use gradflow_core::autograd::{is_recording_enabled, with_no_grad};
use gradflow_core::{no_grad, using_config, GradflowError, Tensor, Variable};

mod common;
use common::{grad_item, init_logger, item};

#[test]
fn test_simple_chain() -> Result<(), GradflowError> {
    init_logger();
    // y = exp(x^2)^2 at x = 0.5; dy/dx = 4x exp(2x^2)
    let x = Variable::from(0.5);
    let y = x.pow(2.0)?.exp()?.pow(2.0)?;
    y.backward()?;
    assert_relative_eq!(grad_item(&x)?, 2.0 * 0.5f64.exp(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_no_grad_builds_no_graph() -> Result<(), GradflowError> {
    init_logger();
    let x = Variable::new(Tensor::new_f64(vec![1.0, 2.0, 3.0], vec![3])?);
    let y = {
        let _guard = no_grad();
        assert!(!is_recording_enabled());
        (&x * 2.0).sin()?
    };
    assert!(is_recording_enabled());
    assert!(y.is_leaf());

    let z = with_no_grad(|| x.exp())?;
    assert!(z.is_leaf());

    let w = {
        let _guard = using_config(false);
        let _inner = using_config(true);
        x.exp()?
    };
    assert!(!w.is_leaf());
    Ok(())
}

#[test]
fn test_linear_regression_fits() -> Result<(), GradflowError> {
    init_logger();
    let n = 100;
    let xs: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|x| 5.0 + 2.0 * x).collect();
    let x = Variable::new(Tensor::new_f64(xs, vec![n, 1])?);
    let y = Variable::new(Tensor::new_f64(ys, vec![n, 1])?);

    let w = Variable::new(Tensor::new_f64(vec![0.0], vec![1, 1])?).with_name("W");
    let b = Variable::new(Tensor::new_f64(vec![0.0], vec![1])?).with_name("b");
    let lr = 0.1;

    let mut first_loss = None;
    let mut last_loss = 0.0;
    for _ in 0..1000 {
        let y_pred = &x.matmul(&w)? + &b;
        let diff = &y_pred - &y;
        let loss = &diff.pow(2.0)?.sum()? / n as f64;

        w.clear_grad();
        b.clear_grad();
        loss.backward()?;

        for param in [&w, &b] {
            let grad = param.grad().expect("parameter gradient").try_data("update")?;
            let step = grad.mul(&Tensor::scalar(lr))?;
            param.set_data(param.try_data("update")?.sub(&step)?)?;
        }

        last_loss = item(&loss)?;
        if first_loss.is_none() {
            first_loss = Some(last_loss);
        }
    }

    assert!(last_loss < first_loss.expect("at least one iteration"));
    assert_relative_eq!(item(&w)?, 2.0, epsilon = 1e-3);
    assert_relative_eq!(item(&b)?, 5.0, epsilon = 1e-3);
    Ok(())
}

#[test]
fn test_two_layer_network_gradients_check() {
    init_logger();
    let x = Variable::new(Tensor::new_f64(vec![0.5, -1.0, 1.5, 0.2, 0.3, -0.7], vec![3, 2]).expect("x"));
    let w1 = Variable::new(Tensor::new_f64(vec![0.1, -0.2, 0.3, 0.4, 0.5, -0.6], vec![2, 3]).expect("w1"));
    let b1 = Variable::new(Tensor::new_f64(vec![0.01, 0.02, 0.03], vec![3]).expect("b1"));
    let w2 = Variable::new(Tensor::new_f64(vec![0.7, -0.8, 0.9], vec![3, 1]).expect("w2"));

    let result = check_grad(
        |p| {
            let h = (&p[0].matmul(&p[1])? + &p[2]).tanh()?;
            h.matmul(&p[3])
        },
        &[x, w1, b1, w2],
        &GradCheckConfig::default(),
    );
    assert!(result.is_ok(), "{:?}", result);
}

#[test]
fn test_mixed_dtypes_are_rejected() -> Result<(), GradflowError> {
    let a = Variable::from(1.0f32);
    let b = Variable::from(1.0f64);
    let result = gradflow_core::ops::add_op(&a, &b);
    assert!(matches!(result, Err(GradflowError::DataTypeMismatch { .. })));
    Ok(())
}
