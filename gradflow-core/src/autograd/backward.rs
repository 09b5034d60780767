use std::collections::HashSet;
use std::rc::Rc;

use log::{debug, trace, warn};

use crate::autograd::config::using_config;
use crate::autograd::OperationNode;
use crate::error::GradflowError;
use crate::ops::add_op;
use crate::variable::Variable;

/// Options of a backward pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackwardOptions {
    /// Keep the gradients of intermediate variables instead of releasing them
    /// once they have been propagated.
    pub retain_grad: bool,
    /// Record the gradient computation so that the gradients can be
    /// differentiated again (higher-order derivatives).
    pub create_graph: bool,
}

impl BackwardOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retain_grad(mut self, retain_grad: bool) -> Self {
        self.retain_grad = retain_grad;
        self
    }

    pub fn create_graph(mut self, create_graph: bool) -> Self {
        self.create_graph = create_graph;
        self
    }
}

/// Pending operations, kept sorted by ascending generation so that `pop`
/// always yields the operation closest to the output side.
struct Worklist {
    pending: Vec<Rc<OperationNode>>,
    // Every node reachable from the root stays alive for the whole pass (the
    // root is borrowed and owns its producer chain), so addresses are stable keys.
    seen: HashSet<*const OperationNode>,
}

impl Worklist {
    fn new() -> Self {
        Worklist {
            pending: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, node: Rc<OperationNode>) {
        if self.seen.insert(Rc::as_ptr(&node)) {
            self.pending.push(node);
            self.pending.sort_by_key(|n| n.generation());
        }
    }

    fn pop(&mut self) -> Option<Rc<OperationNode>> {
        self.pending.pop()
    }
}

/// Adds `gx` to the gradient of `x`, or sets it if `x` has none yet.
fn accumulate_grad(x: &Variable, gx: Variable) -> Result<(), GradflowError> {
    let new_grad = match x.grad() {
        None => gx,
        Some(previous) => add_op(&previous, &gx)?,
    };
    x.set_grad(Some(new_grad));
    Ok(())
}

fn check_grad_shape(x: &Variable, gx: &Variable, operation: &str) {
    if let (Some(x_data), Some(gx_data)) = (x.data(), gx.data()) {
        if x_data.shape != gx_data.shape {
            warn!(
                "{} returned a gradient of shape {:?} for an input of shape {:?}",
                operation, gx_data.shape, x_data.shape
            );
        }
    }
}

/// Generation-ordered reverse traversal from `root`.
pub(crate) fn run_backward(root: &Variable, options: BackwardOptions) -> Result<(), GradflowError> {
    if root.grad().is_none() {
        let seed = root.try_data("backward")?.ones_like();
        root.set_grad(Some(Variable::new(seed)));
    }

    let mut worklist = Worklist::new();
    match root.producer() {
        Some(producer) => worklist.push(producer),
        None => {
            debug!("backward() called on a leaf variable. No operation to perform.");
            return Ok(());
        }
    }
    debug!(
        "backward pass started at generation {} (retain_grad={}, create_graph={})",
        root.generation(),
        options.retain_grad,
        options.create_graph
    );

    let mut processed = 0usize;
    while let Some(node) = worklist.pop() {
        let outputs = node.outputs();
        let gys: Vec<Option<Variable>> = outputs
            .iter()
            .map(|y| y.as_ref().and_then(Variable::grad))
            .collect();
        if gys.iter().all(Option::is_none) {
            debug!("skipping {}: no output carries a gradient", node.name());
            continue;
        }
        trace!("backward through {} (generation {})", node.name(), node.generation());

        {
            let _recording = using_config(options.create_graph);
            let gxs = node.run_backward(&gys)?;
            if gxs.len() != node.inputs().len() {
                return Err(GradflowError::InternalError(format!(
                    "{} returned {} gradients for {} inputs",
                    node.name(),
                    gxs.len(),
                    node.inputs().len()
                )));
            }

            for (x, gx) in node.inputs().iter().zip(gxs) {
                check_grad_shape(x, &gx, node.name());
                accumulate_grad(x, gx)?;
                if let Some(producer) = x.producer() {
                    worklist.push(producer);
                }
            }
        }

        if !options.retain_grad {
            for y in outputs.iter().flatten() {
                y.clear_grad();
            }
        }
        processed += 1;
    }

    debug!("backward pass finished: {} operations processed", processed);
    Ok(())
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
