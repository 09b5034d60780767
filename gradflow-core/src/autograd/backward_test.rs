use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;

use super::*;
use crate::autograd::config::{is_recording_enabled, no_grad};
use crate::autograd::operation::single_upstream;
use crate::autograd::{apply_op, apply_op_single, Operation, OperationContext};
use crate::ops::{self, unary_input};
use crate::tensor::Tensor;
use crate::utils::testing::{check_tensor_near, create_test_variable};

fn grad_item(x: &Variable) -> Result<f64, GradflowError> {
    x.grad().expect("grad missing").try_data("test")?.item()
}

/// Identity that records the order in which backward visits it.
#[derive(Debug)]
struct ProbeOp {
    label: &'static str,
    visits: Rc<RefCell<Vec<&'static str>>>,
}

impl Operation for ProbeOp {
    fn name(&self) -> &'static str {
        "Probe"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.clone()])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        self.visits.borrow_mut().push(self.label);
        Ok(vec![single_upstream(gys, self.name())?.clone()])
    }
}

fn probe(label: &'static str, x: &Variable, visits: &Rc<RefCell<Vec<&'static str>>>) -> Variable {
    let op = ProbeOp {
        label,
        visits: Rc::clone(visits),
    };
    apply_op_single(op, &[x.clone()]).expect("probe forward")
}

/// Copies its input into two outputs; missing output gradients count as zero.
#[derive(Debug)]
struct ForkOp;

impl Operation for ForkOp {
    fn name(&self) -> &'static str {
        "Fork"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        let x = unary_input(xs, self.name())?;
        Ok(vec![x.clone(), x.clone()])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let mut present = gys.iter().flatten();
        let first = present
            .next()
            .ok_or_else(|| GradflowError::InternalError("no upstream gradient".to_string()))?;
        let mut total = first.clone();
        for gy in present {
            total = ops::add_op(&total, gy)?;
        }
        Ok(vec![total])
    }
}

/// Returns one gradient too many.
#[derive(Debug)]
struct ExtraGradOp;

impl Operation for ExtraGradOp {
    fn name(&self) -> &'static str {
        "ExtraGrad"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Ok(vec![unary_input(xs, self.name())?.clone()])
    }

    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        let gy = single_upstream(gys, self.name())?;
        Ok(vec![gy.clone(), gy.clone()])
    }
}

#[test]
fn test_diamond_visits_shared_node_once_and_last() -> Result<(), GradflowError> {
    let visits = Rc::new(RefCell::new(Vec::new()));
    let x = Variable::from(3.0);
    let a = probe("A", &x, &visits);
    let b = probe("B", &a, &visits);
    let c = probe("C", &a, &visits);
    let y = ops::add_op(&b, &c)?;

    y.backward()?;

    let order = visits.borrow().clone();
    assert_eq!(order.len(), 3, "each node runs exactly once: {:?}", order);
    assert!(order[..2].contains(&"B") && order[..2].contains(&"C"));
    assert_eq!(order[2], "A");
    assert_eq!(grad_item(&x)?, 2.0);
    Ok(())
}

#[test]
fn test_diamond_with_uneven_branches() -> Result<(), GradflowError> {
    // the short branch is created first, the long one ends at a later generation
    let visits = Rc::new(RefCell::new(Vec::new()));
    let x = Variable::from(3.0);
    let a = probe("A", &x, &visits);
    let c = probe("C", &a, &visits);
    let b1 = probe("B1", &a, &visits);
    let b2 = probe("B2", &b1, &visits);
    let y = ops::add_op(&c, &b2)?;

    y.backward()?;

    let order = visits.borrow().clone();
    assert_eq!(order.len(), 4, "each node runs exactly once: {:?}", order);
    assert_eq!(order.last(), Some(&"A"));
    let b1_at = order.iter().position(|l| *l == "B1");
    let b2_at = order.iter().position(|l| *l == "B2");
    assert!(b2_at < b1_at);
    assert_eq!(grad_item(&x)?, 2.0);
    Ok(())
}

#[test]
fn test_diamond_of_squares() -> Result<(), GradflowError> {
    // y = (x^2)^2 + (x^2)^2 at x = 2
    let x = Variable::from(2.0);
    let a = ops::pow_op(&x, 2.0)?;
    let y = ops::add_op(&ops::pow_op(&a, 2.0)?, &ops::pow_op(&a, 2.0)?)?;
    y.backward()?;
    assert_eq!(y.try_data("test")?.item()?, 32.0);
    assert_eq!(grad_item(&x)?, 64.0);
    Ok(())
}

#[test]
fn test_backward_on_leaf_seeds_ones() -> Result<(), GradflowError> {
    let x = create_test_variable(vec![1.0, 2.0], vec![2]);
    x.backward()?;
    let gx = x.grad().expect("grad missing").try_data("test")?;
    check_tensor_near(&gx, &[2], &[1.0, 1.0], 0.0);
    Ok(())
}

#[test]
fn test_backward_without_data_fails() {
    let x = Variable::empty();
    assert_eq!(
        x.backward(),
        Err(GradflowError::MissingData {
            operation: "backward".to_string(),
        })
    );
}

#[test]
fn test_gradients_accumulate_across_passes() -> Result<(), GradflowError> {
    let x = Variable::from(3.0);
    let y = ops::add_op(&x, &x)?;
    y.backward()?;
    assert_eq!(grad_item(&x)?, 2.0);

    let y = ops::add_op(&ops::add_op(&x, &x)?, &x)?;
    y.backward()?;
    assert_eq!(grad_item(&x)?, 5.0);

    x.clear_grad();
    y.backward()?;
    assert_eq!(grad_item(&x)?, 3.0);
    Ok(())
}

#[test]
fn test_intermediate_grads_released_by_default() -> Result<(), GradflowError> {
    let x = Variable::from(1.0);
    let a = ops::sin_op(&x)?;
    let y = ops::mul_scalar(&a, 2.0)?;
    y.backward()?;

    assert!(a.grad().is_none());
    assert!(y.grad().is_none());
    assert!(x.grad().is_some());
    Ok(())
}

#[test]
fn test_retain_grad_keeps_intermediate_grads() -> Result<(), GradflowError> {
    let x = Variable::from(1.0);
    let a = ops::sin_op(&x)?;
    let y = ops::mul_scalar(&a, 2.0)?;
    y.backward_with(BackwardOptions::new().retain_grad(true))?;

    assert_eq!(grad_item(&y)?, 1.0);
    assert_eq!(grad_item(&a)?, 2.0);
    assert_relative_eq!(grad_item(&x)?, 2.0 * 1.0f64.cos(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_gradients_are_leaves_without_create_graph() -> Result<(), GradflowError> {
    let x = Variable::from(2.0);
    let y = ops::pow_op(&x, 3.0)?;
    y.backward()?;
    let gx = x.grad().expect("grad missing");
    assert!(gx.is_leaf());
    assert!(is_recording_enabled());
    Ok(())
}

#[test]
fn test_second_derivative_of_quartic() -> Result<(), GradflowError> {
    // f(x) = x^4 - 2x^2, f'(2) = 24, f''(2) = 44
    let x = Variable::from(2.0);
    let y = ops::sub_op(&ops::pow_op(&x, 4.0)?, &ops::mul_scalar(&ops::pow_op(&x, 2.0)?, 2.0)?)?;
    y.backward_with(BackwardOptions::new().create_graph(true))?;

    let gx = x.grad().expect("first derivative missing");
    assert_eq!(gx.try_data("test")?.item()?, 24.0);

    x.clear_grad();
    gx.backward()?;
    assert_eq!(grad_item(&x)?, 44.0);
    Ok(())
}

#[test]
fn test_create_graph_restores_recording_flag() -> Result<(), GradflowError> {
    let x = Variable::from(2.0);
    let y = ops::pow_op(&x, 2.0)?;
    {
        let _guard = no_grad();
        let z = ops::pow_op(&x, 2.0)?;
        assert!(z.is_leaf());
        y.backward_with(BackwardOptions::new().create_graph(true))?;
        assert!(!is_recording_enabled());
    }
    assert!(is_recording_enabled());
    assert!(!x.grad().expect("grad missing").is_leaf());
    Ok(())
}

#[test]
fn test_dropped_output_gets_no_gradient() -> Result<(), GradflowError> {
    let x = Variable::from(2.0);
    let mut ys = apply_op(ForkOp, &[x.clone()])?;
    let y0 = ys.remove(0);
    drop(ys);

    let z = ops::mul_scalar(&y0, 3.0)?;
    z.backward()?;
    assert_eq!(grad_item(&x)?, 3.0);
    Ok(())
}

#[test]
fn test_both_outputs_contribute() -> Result<(), GradflowError> {
    let x = Variable::from(2.0);
    let ys = apply_op(ForkOp, &[x.clone()])?;
    let z = ops::add_op(&ops::mul_scalar(&ys[0], 3.0)?, &ops::mul_scalar(&ys[1], 5.0)?)?;
    z.backward()?;
    assert_eq!(grad_item(&x)?, 8.0);
    Ok(())
}

#[test]
fn test_gradient_count_mismatch_is_internal_error() -> Result<(), GradflowError> {
    let x = Variable::from(1.0);
    let y = apply_op_single(ExtraGradOp, &[x])?;
    assert!(matches!(y.backward(), Err(GradflowError::InternalError(_))));
    Ok(())
}

#[test]
fn test_graph_released_after_outputs_dropped() -> Result<(), GradflowError> {
    let x = Variable::from(2.0);
    let (weak_mid, weak_node) = {
        let mid = ops::sin_op(&x)?;
        let y = ops::mul_scalar(&mid, 2.0)?;
        let weak_mid = Rc::downgrade(&mid.inner);
        let weak_node = Rc::downgrade(&y.producer().expect("producer missing"));
        y.backward()?;
        drop(mid);
        assert!(weak_mid.upgrade().is_some(), "y's producer keeps mid alive");
        (weak_mid, weak_node)
    };
    assert!(weak_mid.upgrade().is_none());
    assert!(weak_node.upgrade().is_none());
    assert_eq!(Rc::strong_count(&x.inner), 1);
    assert!(x.grad().is_some());
    Ok(())
}

#[test]
fn test_long_chain() -> Result<(), GradflowError> {
    let x = Variable::from(1.0);
    let mut y = x.clone();
    for _ in 0..200 {
        y = ops::add_scalar(&y, 1.0)?;
    }
    y.backward()?;
    assert_eq!(y.try_data("test")?.item()?, 201.0);
    assert_eq!(grad_item(&x)?, 1.0);
    Ok(())
}

#[test]
fn test_deep_chain_drops_without_recursion() -> Result<(), GradflowError> {
    let x = Variable::from(0.0);
    let mut y = x.clone();
    for _ in 0..100_000 {
        y = ops::add_scalar(&y, 1.0)?;
    }
    y.backward()?;
    assert_eq!(grad_item(&x)?, 1.0);
    let weak_node = Rc::downgrade(&y.producer().expect("producer missing"));
    drop(y);
    assert!(weak_node.upgrade().is_none());
    assert_eq!(Rc::strong_count(&x.inner), 1);
    Ok(())
}

#[test]
fn test_deep_chain_with_recorded_grad_drops() -> Result<(), GradflowError> {
    let x = Variable::from(1.0);
    let mut y = x.clone();
    for _ in 0..20_000 {
        y = ops::mul_scalar(&y, 1.0)?;
    }
    y.backward_with(BackwardOptions::new().create_graph(true))?;
    let gx = x.grad().expect("grad missing");
    assert!(!gx.is_leaf());
    drop(y);
    x.clear_grad();
    drop(gx);
    assert_eq!(Rc::strong_count(&x.inner), 1);
    Ok(())
}

#[test]
fn test_shared_input_survives_release() -> Result<(), GradflowError> {
    let x = Variable::from(2.0);
    let mid = ops::sin_op(&x)?;
    let y = ops::mul_op(&mid, &mid)?;
    drop(y);
    // mid is still held here, so its own producer must stay intact
    assert!(!mid.is_leaf());
    mid.backward()?;
    assert_relative_eq!(grad_item(&x)?, 2.0f64.cos(), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_backward_options_builder() {
    let options = BackwardOptions::new().retain_grad(true).create_graph(true);
    assert!(options.retain_grad && options.create_graph);
    assert_eq!(BackwardOptions::default(), BackwardOptions::new());
}
