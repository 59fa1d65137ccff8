//! Numerical solvers for sirsim.
//!
//! - [`transient::rk4`]: classical fixed-step 4th-order Runge-Kutta for any
//!   [`OdeProblem`](sirsim_core::OdeProblem)

pub mod transient;
