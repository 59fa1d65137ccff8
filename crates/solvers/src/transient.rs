//! Time integration of ODE problems.

pub mod rk4;
