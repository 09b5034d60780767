// gradflow-core/src/variable/mod.rs

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::autograd::backward::{run_backward, BackwardOptions};
use crate::autograd::operation::release_graph;
use crate::autograd::OperationNode;
use crate::error::GradflowError;
use crate::tensor::Tensor;
use crate::types::DType;

mod conversion;
mod methods;
mod operators;

/// Internal state of a `Variable`.
///
/// Lives behind `Rc<RefCell<..>>` so that the graph (operation inputs, weak
/// output handles, gradient links) can share and update it.
pub(crate) struct VariableData {
    /// `None` means "no data yet", which is distinct from a tensor of zeros.
    pub(crate) data: Option<Tensor>,
    pub(crate) name: Option<String>,
    /// Accumulated upstream derivative. `None` means "not computed yet", not zero.
    pub(crate) grad: Option<Variable>,
    /// The operation that produced this variable; `None` for graph leaves.
    pub(crate) producer: Option<Rc<OperationNode>>,
    /// Depth in the recorded graph: producer generation + 1, or 0 for leaves.
    pub(crate) generation: usize,
}

impl Drop for VariableData {
    fn drop(&mut self) {
        if self.producer.is_some() || self.grad.is_some() {
            release_graph(self.producer.take(), self.grad.take());
        }
    }
}

/// A node of the computation graph: a tensor value plus its provenance and gradient.
///
/// `Variable` is a cheap handle (`Rc`); clones refer to the same node. Operations
/// applied to variables while recording is enabled link the results to the
/// operation that produced them, and `backward()` walks those links in reverse.
#[derive(Clone)]
pub struct Variable {
    pub(crate) inner: Rc<RefCell<VariableData>>,
}

impl Variable {
    /// Wraps a tensor into a new leaf variable.
    pub fn new(data: Tensor) -> Self {
        Self::from_option(Some(data))
    }

    /// Creates a leaf variable without data.
    pub fn empty() -> Self {
        Self::from_option(None)
    }

    pub fn from_option(data: Option<Tensor>) -> Self {
        Variable {
            inner: Rc::new(RefCell::new(VariableData {
                data,
                name: None,
                grad: None,
                producer: None,
                generation: 0,
            })),
        }
    }

    /// Attaches a human-readable name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.inner.borrow_mut().name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<String> {
        self.inner.borrow().name.clone()
    }

    /// Returns the underlying tensor, if any.
    pub fn data(&self) -> Option<Tensor> {
        self.inner.borrow().data.clone()
    }

    /// Returns the underlying tensor or `MissingData` naming `operation`.
    pub fn try_data(&self, operation: &str) -> Result<Tensor, GradflowError> {
        self.data().ok_or_else(|| GradflowError::MissingData {
            operation: operation.to_string(),
        })
    }

    /// Replaces the tensor content. The shape of a variable never changes once it
    /// holds data, so a tensor of a different shape is rejected.
    pub fn set_data(&self, data: Tensor) -> Result<(), GradflowError> {
        let mut guard = self.inner.borrow_mut();
        if let Some(current) = guard.data.as_ref() {
            if current.shape != data.shape {
                return Err(GradflowError::ShapeMismatch {
                    expected: current.shape(),
                    actual: data.shape(),
                    operation: "set_data".to_string(),
                });
            }
        }
        guard.data = Some(data);
        Ok(())
    }

    /// Returns the accumulated gradient, if one has been computed.
    pub fn grad(&self) -> Option<Variable> {
        self.inner.borrow().grad.clone()
    }

    pub(crate) fn set_grad(&self, grad: Option<Variable>) {
        self.inner.borrow_mut().grad = grad;
    }

    /// Resets the gradient to "not computed".
    ///
    /// Call this between unrelated backward passes over the same leaf, otherwise
    /// the second pass adds to the first.
    pub fn clear_grad(&self) {
        self.inner.borrow_mut().grad = None;
    }

    /// The operation that produced this variable, or `None` for a leaf.
    pub fn producer(&self) -> Option<Rc<OperationNode>> {
        self.inner.borrow().producer.clone()
    }

    pub(crate) fn set_producer(&self, node: Rc<OperationNode>) {
        let mut guard = self.inner.borrow_mut();
        guard.generation = node.generation() + 1;
        guard.producer = Some(node);
    }

    pub fn generation(&self) -> usize {
        self.inner.borrow().generation
    }

    /// True when the variable was not produced by a recorded operation.
    pub fn is_leaf(&self) -> bool {
        self.inner.borrow().producer.is_none()
    }

    pub fn shape(&self) -> Result<Vec<usize>, GradflowError> {
        Ok(self.try_data("shape")?.shape())
    }

    pub fn ndim(&self) -> Result<usize, GradflowError> {
        Ok(self.try_data("ndim")?.ndim())
    }

    pub fn numel(&self) -> Result<usize, GradflowError> {
        Ok(self.try_data("numel")?.numel())
    }

    pub fn dtype(&self) -> Result<DType, GradflowError> {
        Ok(self.try_data("dtype")?.dtype())
    }

    /// Size of the first axis.
    pub fn len(&self) -> Result<usize, GradflowError> {
        let data = self.try_data("len")?;
        data.shape.first().copied().ok_or(GradflowError::InvalidAxis { axis: 0, rank: 0 })
    }

    /// True if both handles refer to the same graph node.
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identity of the node, stable for its lifetime.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    /// Back-propagates from this variable with default options: intermediate
    /// gradients are released and the backward pass is not recorded.
    pub fn backward(&self) -> Result<(), GradflowError> {
        run_backward(self, BackwardOptions::default())
    }

    /// Back-propagates from this variable.
    ///
    /// With `retain_grad` every intermediate variable keeps its gradient. With
    /// `create_graph` the gradient computation is itself recorded, so the
    /// resulting gradients can be differentiated again.
    pub fn backward_with(&self, options: BackwardOptions) -> Result<(), GradflowError> {
        run_backward(self, options)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.borrow();
        f.debug_struct("Variable")
            .field("name", &guard.name)
            .field("data", &guard.data)
            .field("generation", &guard.generation)
            .field("producer", &guard.producer.as_ref().map(|p| p.name()))
            .field("has_grad", &guard.grad.is_some())
            .finish()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.borrow().data.as_ref() {
            Some(data) => write!(f, "variable({})", data),
            None => write!(f, "variable(None)"),
        }
    }
}

#[cfg(test)]
#[path = "variable_test.rs"]
mod tests;
