//! Deterministic SIR epidemic simulation.
//!
//! A population of size `N` is split into susceptible, infected, and
//! recovered compartments that evolve as
//!
//! ```text
//! dS/dt = -(beta * S * I) / N
//! dI/dt =  (beta * S * I) / N - gamma * I
//! dR/dt =  gamma * I
//! ```
//!
//! [`SirModel`] integrates this system with the classical fixed-step RK4
//! solver from `sirsim-solvers`, advancing all three compartments jointly, and
//! returns a [`Trajectory`] with one entry per step.
//!
//! # Example
//!
//! ```
//! use sirsim::{ModelParameters, SirModel};
//!
//! let parameters = ModelParameters::with_population(1000.0).unwrap();
//! let model = SirModel::new(parameters).unwrap();
//!
//! let trajectory = model.simulate(200).unwrap();
//! assert_eq!(trajectory.len(), 201);
//! assert_eq!(trajectory.infected()[0], 1.0);
//! ```

mod error;
mod initial;
mod model;
mod parameters;
mod state;
mod trajectory;

pub mod config;
pub mod export;
#[cfg(feature = "plot")]
pub mod plot;
pub mod report;

pub use error::Error;
pub use initial::{Compartment, InitialConditionError, InitialConditions};
pub use model::{DEFAULT_STEP_SIZE, SirInput, SirModel, SirProblem};
pub use parameters::{DEFAULT_BETA, DEFAULT_GAMMA, ModelParameters, ParameterError};
pub use sirsim_solvers::transient::rk4::Status;
pub use state::{Rates, State};
pub use trajectory::Trajectory;
