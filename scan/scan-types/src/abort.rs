//! Cancellation flag for pipeline invocations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable cancellation flag.
///
/// One signal is created per pipeline invocation and handed to every stage
/// that may run for a long time. Stages poll [`AbortSignal::is_aborted`] at
/// loop boundaries and stop without publishing partial results once it is set.
///
/// # Example
///
/// ```
/// use scan_types::AbortSignal;
///
/// let signal = AbortSignal::new();
/// let worker_copy = signal.clone();
/// assert!(!worker_copy.is_aborted());
///
/// signal.abort();
/// assert!(worker_copy.is_aborted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    flag: Arc<AtomicBool>,
}

impl AbortSignal {
    /// Create a new, un-raised signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Every clone observes it.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Check whether the signal has been raised.
    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_not_aborted() {
        assert!(!AbortSignal::default().is_aborted());
    }

    #[test]
    fn test_abort_visible_across_threads() {
        let signal = AbortSignal::new();
        let remote = signal.clone();
        let handle = std::thread::spawn(move || {
            remote.abort();
        });
        handle.join().unwrap();
        assert!(signal.is_aborted());
    }

    #[test]
    fn test_independent_signals() {
        let a = AbortSignal::new();
        let b = AbortSignal::new();
        a.abort();
        assert!(!b.is_aborted());
    }
}
