//! Recording toggle.
//!
//! Whether operations link their outputs into the graph is controlled by a
//! thread-local flag, enabled by default. The flag is only changed through
//! [`RecordingGuard`], which restores the previous value when dropped, so the
//! setting is restored on every exit path of a scope (early `?` returns and
//! panics included) and nested scopes unwind in order.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static RECORDING_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Returns true if operations on this thread currently record the graph.
pub fn is_recording_enabled() -> bool {
    RECORDING_ENABLED.with(|enabled| enabled.get())
}

/// RAII guard setting the recording flag for its lifetime.
#[must_use = "recording is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RecordingGuard {
    previous: bool,
    // The flag is thread-local: the guard must be dropped on the thread that created it.
    _not_send: PhantomData<*const ()>,
}

impl RecordingGuard {
    pub fn new(enabled: bool) -> Self {
        let previous = RECORDING_ENABLED.with(|flag| flag.replace(enabled));
        RecordingGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    /// The value the flag had before this guard was created.
    pub fn previous(&self) -> bool {
        self.previous
    }
}

impl Drop for RecordingGuard {
    fn drop(&mut self) {
        RECORDING_ENABLED.with(|flag| flag.set(self.previous));
    }
}

/// Sets the recording flag to `enabled` until the returned guard is dropped.
pub fn using_config(enabled: bool) -> RecordingGuard {
    RecordingGuard::new(enabled)
}

/// Disables recording until the returned guard is dropped.
///
/// ```
/// use gradflow_core::{autograd::no_grad, Variable};
///
/// let x = Variable::from(3.0);
/// let y = {
///     let _guard = no_grad();
///     &x * &x
/// };
/// assert!(y.producer().is_none());
/// ```
pub fn no_grad() -> RecordingGuard {
    RecordingGuard::new(false)
}

/// Runs `f` with the recording flag set to `enabled`.
pub fn with_recording<F, R>(enabled: bool, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = RecordingGuard::new(enabled);
    f()
}

/// Runs `f` with recording disabled.
pub fn with_no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_recording(false, f)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
