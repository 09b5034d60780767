use gradflow_core::{GradflowError, Variable};

/// Routes `log` output through env_logger; set `RUST_LOG=debug` to see the
/// backward pass. Safe to call from every test.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Value of a 0-d (or single-element) variable.
#[allow(dead_code)]
pub fn item(x: &Variable) -> Result<f64, GradflowError> {
    x.try_data("test")?.item()
}

/// Value of the gradient of a single-element variable.
#[allow(dead_code)]
pub fn grad_item(x: &Variable) -> Result<f64, GradflowError> {
    let grad = x.grad().expect("variable has no gradient");
    item(&grad)
}
