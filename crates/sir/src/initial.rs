use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::{ModelParameters, State};

/// Relative tolerance when checking that explicit compartments sum to `N`.
const POPULATION_REL_TOL: f64 = 1e-9;

/// One of the three SIR compartments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compartment {
    Susceptible,
    Infected,
    Recovered,
}

impl Compartment {
    /// All compartments, in `S, I, R` order.
    pub const ALL: [Compartment; 3] = [Self::Susceptible, Self::Infected, Self::Recovered];

    /// Returns the lowercase name of the compartment.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Susceptible => "susceptible",
            Self::Infected => "infected",
            Self::Recovered => "recovered",
        }
    }

    /// Returns this compartment's value in `state`.
    #[must_use]
    pub fn of(self, state: &State) -> f64 {
        match self {
            Self::Susceptible => state.susceptible,
            Self::Infected => state.infected,
            Self::Recovered => state.recovered,
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional overrides for the initial compartment values.
///
/// Unset values fall back to a single seed infection: `infected = 1`,
/// `recovered = 0`, and `susceptible = N - infected - recovered`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitialConditions {
    pub susceptible: Option<f64>,
    pub infected: Option<f64>,
    pub recovered: Option<f64>,
}

/// Errors that can occur when resolving initial conditions.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum InitialConditionError {
    #[error("initial {0} must be finite and non-negative")]
    Invalid(Compartment),

    #[error("initial infected and recovered ({seeded}) exceed the population ({population})")]
    ExceedsPopulation { seeded: f64, population: f64 },

    #[error("initial compartments sum to {total}, expected the population ({population})")]
    Inconsistent { total: f64, population: f64 },
}

impl InitialConditions {
    /// Resolves the overrides into a full initial state for `parameters`.
    ///
    /// # Errors
    ///
    /// Returns an error if any given value is negative or not finite, if the
    /// seeded compartments leave no room for a non-negative susceptible
    /// population, or if all three are given and do not sum to the population.
    pub fn resolve(&self, parameters: &ModelParameters) -> Result<State, InitialConditionError> {
        let population = parameters.population();

        let infected = checked(self.infected, 1.0, Compartment::Infected)?;
        let recovered = checked(self.recovered, 0.0, Compartment::Recovered)?;
        let seeded = infected + recovered;

        let susceptible = match self.susceptible {
            Some(_) => {
                let susceptible = checked(self.susceptible, 0.0, Compartment::Susceptible)?;
                let total = susceptible + seeded;
                if (total - population).abs() > POPULATION_REL_TOL * population {
                    return Err(InitialConditionError::Inconsistent { total, population });
                }
                susceptible
            }
            None => {
                if seeded > population {
                    return Err(InitialConditionError::ExceedsPopulation { seeded, population });
                }
                population - seeded
            }
        };

        Ok(State::new(susceptible, infected, recovered))
    }
}

fn checked(
    value: Option<f64>,
    default: f64,
    compartment: Compartment,
) -> Result<f64, InitialConditionError> {
    match value {
        None => Ok(default),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(_) => Err(InitialConditionError::Invalid(compartment)),
    }
}
