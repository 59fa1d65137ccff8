use sirsim_core::Snapshot;

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of an RK4 integration.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// How the solver terminated.
    pub status: Status,

    /// Accepted snapshots, starting with the initial state.
    ///
    /// Always holds `steps + 1` entries.
    pub history: Vec<Snapshot<I, O>>,

    /// Number of integration steps completed.
    pub steps: usize,
}

impl<I, O> Solution<I, O> {
    /// Returns the last accepted snapshot.
    #[must_use]
    pub fn last(&self) -> &Snapshot<I, O> {
        self.history
            .last()
            .unwrap_or_else(|| unreachable!("history always contains the initial snapshot"))
    }
}
