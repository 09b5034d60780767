//! # Autograd
//!
//! Define-by-run reverse-mode differentiation. Applying an [`Operation`] to
//! variables while recording is enabled (see [`config`]) links the outputs to
//! an [`OperationNode`]; [`Variable::backward`](crate::Variable::backward) then
//! walks these links from the output side back to the leaves, ordered by
//! generation.

pub mod backward;
pub mod config;
pub mod grad_check;
pub mod operation;

pub use backward::BackwardOptions;
pub use config::{is_recording_enabled, no_grad, using_config, with_no_grad, with_recording, RecordingGuard};
pub use operation::{apply_op, apply_op_single, Operation, OperationContext, OperationNode};
