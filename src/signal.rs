//! Cohort-wide episode termination signal.
//!
//! Any agent may raise the signal; every agent remembers the last value it saw
//! and ends its episode when the value it observes differs. Agents never hold
//! references to each other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared, monotonically increasing termination counter.
///
/// Cloning yields another handle to the same counter.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    value: Arc<AtomicU64>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the whole cohort restart. Returns the new value.
    pub fn raise(&self) -> u64 {
        self.value.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Current value.
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// Returns the counter to zero.
    ///
    /// Only valid when no agent holds a remembered value, i.e. while the
    /// cohort is being (re)built.
    pub(crate) fn reset(&self) {
        self.value.store(0, Ordering::Release);
    }

    /// True if both handles point at the same counter.
    pub fn same_cohort(&self, other: &ShutdownSignal) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

/// Per-agent memory of the last observed signal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalWatcher {
    remembered: u64,
}

impl SignalWatcher {
    /// Starts watching from the signal's current value.
    pub fn attach(signal: &ShutdownSignal) -> Self {
        Self {
            remembered: signal.value(),
        }
    }

    /// Compares `observed` with the remembered value by equality.
    ///
    /// On a mismatch the observed value is adopted and `true` is returned.
    pub fn observe(&mut self, observed: u64) -> bool {
        if observed != self.remembered {
            self.remembered = observed;
            true
        } else {
            false
        }
    }

    pub fn remembered(&self) -> u64 {
        self.remembered
    }
}
