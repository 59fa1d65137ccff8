//! Core traits and types for sirsim.
//!
//! This crate defines the abstractions that the solvers, observers, and the
//! SIR model build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`OdeProblem`]: adapts a model to an ODE solver by extracting a state,
//!   its derivative, and rebuilding model input from a stepped state
//! - [`StepIntegrable`]: a state that can be advanced by `derivative * delta`

mod model;
mod observer;
mod problems;
mod step;

pub use model::{Model, Snapshot};
pub use observer::Observer;
pub use problems::OdeProblem;
pub use step::{DerivativeOf, StepIntegrable};
