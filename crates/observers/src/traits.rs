//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, so an
//! observer can be written once and handed to any solver that provides them.
//!
//! # Example
//!
//! ```rust
//! use sirsim_core::Observer;
//! use sirsim_observers::traits::{CanStopEarly, HasStep};
//!
//! struct AtMost(usize);
//!
//! impl<E: HasStep, A: CanStopEarly> Observer<E, A> for AtMost {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.step() >= self.0).then(A::stop_early)
//!     }
//! }
//! ```

use sirsim_solvers::transient::rk4;

/// An event that belongs to a numbered solver step.
pub trait HasStep {
    /// Returns the step number, starting at 0 for the initial state.
    fn step(&self) -> usize;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl<I, O> HasStep for rk4::Event<I, O> {
    fn step(&self) -> usize {
        self.step
    }
}

impl CanStopEarly for rk4::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
