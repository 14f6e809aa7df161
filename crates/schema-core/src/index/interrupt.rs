//! Stopping a running search pass from another thread.
//!
//! A pass is bracketed by [`SearchInterrupt::begin`]. An interrupt only lands
//! while a pass is running: a signal that arrives between searches is reported
//! back to the sender and never carries over into the next search.

use crate::{Result, SchemaError};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const INTERRUPTED: u8 = 2;

/// Shared handle for interrupting [`crate::index::filter_interruptible`].
///
/// Clones share state, so one clone can sit in a signal handler while the
/// search loop holds another.
#[derive(Debug, Clone, Default)]
pub struct SearchInterrupt {
    state: Arc<AtomicU8>,
}

impl SearchInterrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a search pass as running until the returned guard is dropped.
    pub fn begin(&self) -> SearchPass<'_> {
        self.state.store(RUNNING, Ordering::SeqCst);
        SearchPass { interrupt: self }
    }

    /// Stop the running pass. Returns `false` when no pass is running.
    pub fn interrupt(&self) -> bool {
        self.state
            .compare_exchange(RUNNING, INTERRUPTED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_interrupted(&self) -> bool {
        self.state.load(Ordering::SeqCst) == INTERRUPTED
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.is_interrupted() {
            Err(SchemaError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// A running search pass; dropping it returns the handle to idle.
#[must_use = "the pass ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SearchPass<'a> {
    interrupt: &'a SearchInterrupt,
}

impl Drop for SearchPass<'_> {
    fn drop(&mut self) {
        self.interrupt.state.store(IDLE, Ordering::SeqCst);
    }
}
