use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};

use log::trace;

use crate::autograd::config::is_recording_enabled;
use crate::error::GradflowError;
use crate::tensor::Tensor;
use crate::variable::{Variable, VariableData};

/// Defines one differentiable primitive.
///
/// An operation is created for every call (it is never reused), run once through
/// [`apply_op`], and, when recording is enabled, kept alive by the variables it
/// produced so that `backward` can be called on it later.
///
/// Both rules have default bodies that fail with
/// `GradflowError::NotImplemented`; a concrete operation overrides the ones it
/// supports.
pub trait Operation: Debug {
    /// Short name used in logs, errors and graph traversals.
    fn name(&self) -> &'static str;

    /// Computes the outputs from the raw input tensors.
    ///
    /// May stash whatever the backward rule needs (input shapes, constants).
    fn forward(&mut self, _xs: &[Tensor]) -> Result<Vec<Tensor>, GradflowError> {
        Err(GradflowError::NotImplemented {
            operation: self.name().to_string(),
            stage: "forward".to_string(),
        })
    }

    /// Computes one gradient per input from the gradients of the outputs.
    ///
    /// `gys[i]` is the gradient of output `i`, or `None` if that output carries
    /// no gradient (or has been dropped). The rule must be written with
    /// `Variable` operations, not raw tensor arithmetic: when the backward pass
    /// runs with `create_graph`, this is what records the gradient computation
    /// so that it can be differentiated again.
    fn backward(
        &self,
        _ctx: &OperationContext<'_>,
        _gys: &[Option<Variable>],
    ) -> Result<Vec<Variable>, GradflowError> {
        Err(GradflowError::NotImplemented {
            operation: self.name().to_string(),
            stage: "backward".to_string(),
        })
    }
}

/// A recorded application of an [`Operation`].
///
/// Holds its inputs strongly and its outputs weakly: each output holds its
/// producer strongly, so a strong handle in this direction would form a cycle
/// and the graph would never be freed.
pub struct OperationNode {
    operation: Box<dyn Operation>,
    inputs: Vec<Variable>,
    outputs: Vec<Weak<RefCell<VariableData>>>,
    generation: usize,
}

impl OperationNode {
    pub fn name(&self) -> &'static str {
        self.operation.name()
    }

    /// Maximum generation over the inputs.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn inputs(&self) -> &[Variable] {
        &self.inputs
    }

    /// The outputs that are still alive; `None` marks a dropped output.
    pub fn outputs(&self) -> Vec<Option<Variable>> {
        self.outputs.iter().map(upgrade_output).collect()
    }

    pub fn operation(&self) -> &dyn Operation {
        self.operation.as_ref()
    }

    pub(crate) fn run_backward(&self, gys: &[Option<Variable>]) -> Result<Vec<Variable>, GradflowError> {
        let ctx = OperationContext {
            inputs: &self.inputs,
            outputs: &self.outputs,
        };
        self.operation.backward(&ctx, gys)
    }
}

impl Debug for OperationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationNode")
            .field("operation", &self.operation)
            .field("generation", &self.generation)
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}

/// Frees a detached part of the graph without recursing through it.
///
/// Dropping a producer normally drops its inputs, whose producers drop their
/// inputs, and so on: one stack frame per recorded operation. Here every node
/// and variable that is uniquely owned is taken apart on an explicit stack;
/// anything still shared elsewhere is left to its remaining owners.
pub(crate) fn release_graph(producer: Option<Rc<OperationNode>>, grad: Option<Variable>) {
    let mut nodes: Vec<Rc<OperationNode>> = producer.into_iter().collect();
    let mut variables: Vec<Variable> = grad.into_iter().collect();
    loop {
        if let Some(variable) = variables.pop() {
            if let Ok(cell) = Rc::try_unwrap(variable.inner) {
                let mut data = cell.into_inner();
                nodes.extend(data.producer.take());
                variables.extend(data.grad.take());
            }
            continue;
        }
        match nodes.pop() {
            Some(node) => {
                if let Ok(mut node) = Rc::try_unwrap(node) {
                    variables.append(&mut node.inputs);
                }
            }
            None => break,
        }
    }
}

fn upgrade_output(output: &Weak<RefCell<VariableData>>) -> Option<Variable> {
    output.upgrade().map(|inner| Variable { inner })
}

/// What a backward rule may look at besides the upstream gradients.
pub struct OperationContext<'a> {
    inputs: &'a [Variable],
    outputs: &'a [Weak<RefCell<VariableData>>],
}

impl<'a> OperationContext<'a> {
    pub fn inputs(&self) -> &'a [Variable] {
        self.inputs
    }

    pub fn input(&self, index: usize) -> Result<&'a Variable, GradflowError> {
        self.inputs.get(index).ok_or_else(|| {
            GradflowError::InternalError(format!(
                "input {} requested from an operation with {} inputs",
                index,
                self.inputs.len()
            ))
        })
    }

    /// Output `index`, or `None` if it has been dropped.
    pub fn output(&self, index: usize) -> Option<Variable> {
        self.outputs.get(index).and_then(upgrade_output)
    }
}

/// Runs `operation` on `inputs` and, if recording is enabled, links the
/// outputs into the graph.
///
/// The returned variables are leaves (no producer) when recording is disabled.
pub fn apply_op<O>(mut operation: O, inputs: &[Variable]) -> Result<Vec<Variable>, GradflowError>
where
    O: Operation + 'static,
{
    let xs = inputs
        .iter()
        .map(|x| x.try_data(operation.name()))
        .collect::<Result<Vec<_>, _>>()?;
    let ys = operation.forward(&xs)?;
    let outputs: Vec<Variable> = ys.into_iter().map(Variable::new).collect();

    if is_recording_enabled() {
        let generation = inputs.iter().map(Variable::generation).max().unwrap_or(0);
        let node = Rc::new(OperationNode {
            operation: Box::new(operation),
            inputs: inputs.to_vec(),
            outputs: outputs.iter().map(|y| Rc::downgrade(&y.inner)).collect(),
            generation,
        });
        trace!("recorded {} at generation {}", node.name(), generation);
        for y in &outputs {
            y.set_producer(Rc::clone(&node));
        }
    }
    Ok(outputs)
}

/// [`apply_op`] for operations with exactly one output.
pub fn apply_op_single<O>(operation: O, inputs: &[Variable]) -> Result<Variable, GradflowError>
where
    O: Operation + 'static,
{
    let name = operation.name();
    let mut outputs = apply_op(operation, inputs)?;
    if outputs.len() != 1 {
        return Err(GradflowError::InternalError(format!(
            "{} produced {} outputs, expected 1",
            name,
            outputs.len()
        )));
    }
    Ok(outputs.remove(0))
}

/// The gradient of the only output of a single-output operation.
pub(crate) fn single_upstream<'g>(
    gys: &'g [Option<Variable>],
    operation: &str,
) -> Result<&'g Variable, GradflowError> {
    match gys {
        [Some(gy)] => Ok(gy),
        _ => Err(GradflowError::InternalError(format!(
            "{} expects exactly one upstream gradient, got {:?}",
            operation,
            gys.iter().map(Option::is_some).collect::<Vec<_>>()
        ))),
    }
}

#[cfg(test)]
#[path = "operation_test.rs"]
mod tests;
