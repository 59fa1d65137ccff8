use sirsim_solvers::transient::rk4;
use thiserror::Error;

use crate::{InitialConditionError, ParameterError};

/// Errors returned when building or running an SIR simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// The model parameters are invalid.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// The initial compartment values are invalid.
    #[error(transparent)]
    InitialCondition(#[from] InitialConditionError),

    /// The step size is zero, negative, or not finite.
    #[error("step size must be finite and positive, got {0}")]
    StepSize(f64),

    /// The solver failed.
    #[error("integration failed: {0}")]
    Solver(#[from] rk4::Error),
}
