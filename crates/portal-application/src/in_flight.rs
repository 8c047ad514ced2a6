use std::sync::atomic::{AtomicUsize, Ordering};

/// Marks an operation as in progress until dropped.
///
/// Dropping covers every exit path, including an abandoned future.
pub(crate) struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    pub(crate) fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) fn is_active(counter: &AtomicUsize) -> bool {
    counter.load(Ordering::SeqCst) > 0
}
