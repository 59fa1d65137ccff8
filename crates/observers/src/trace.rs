use std::fmt::Debug;

use sirsim_core::Observer;

use crate::traits::HasStep;

/// An observer that reports solver events at `debug` level via `tracing`.
///
/// Never returns an action. Use [`every`](Self::every) to thin out long runs.
#[derive(Debug, Clone)]
pub struct TraceObserver {
    label: &'static str,
    every: usize,
    reported: usize,
}

impl TraceObserver {
    /// Creates an observer that reports every event under `label`.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            every: 1,
            reported: 0,
        }
    }

    /// Reports only steps that are a multiple of `n`.
    ///
    /// A value of 0 is treated as 1.
    #[must_use]
    pub fn every(mut self, n: usize) -> Self {
        self.every = n.max(1);
        self
    }

    /// Returns how many events have been reported so far.
    #[must_use]
    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl<E, A> Observer<E, A> for TraceObserver
where
    E: HasStep + Debug,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let step = event.step();
        if step % self.every == 0 {
            tracing::debug!(label = self.label, step, ?event, "solver event");
            self.reported += 1;
        }
        None
    }
}

/// Allows `&mut TraceObserver` to be passed to solvers that take an observer
/// by value, so the report count can be read after the solve completes.
impl<E, A> Observer<E, A> for &mut TraceObserver
where
    E: HasStep + Debug,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}
