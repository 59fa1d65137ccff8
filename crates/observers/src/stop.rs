use sirsim_core::Observer;

use crate::traits::CanStopEarly;

/// An observer that stops the solver the first time `predicate` holds.
///
/// Works with any solver whose action type implements [`CanStopEarly`].
///
/// # Example
///
/// ```ignore
/// let observer = StopWhen::new(|event: &rk4::Event<SirInput, Rates>| {
///     event.snapshot.input.state.infected < 1.0
/// });
/// rk4::solve(&model, &problem, initial, dt, steps, observer)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StopWhen<F> {
    predicate: F,
}

impl<F> StopWhen<F> {
    /// Creates an observer that stops once `predicate` returns `true`.
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, A, F> Observer<E, A> for StopWhen<F>
where
    F: FnMut(&E) -> bool,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (self.predicate)(event).then(A::stop_early)
    }
}
