use thiserror::Error;

/// Default transmission rate.
pub const DEFAULT_BETA: f64 = 0.2;

/// Default recovery rate, a ten-day infectious period.
pub const DEFAULT_GAMMA: f64 = 0.1;

/// Fixed parameters of an SIR model.
///
/// The population is real-valued because the compartments are continuous
/// approximations of head counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    population: f64,
    beta: f64,
    gamma: f64,
}

/// Errors that can occur when validating model parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    #[error("population must be finite and positive")]
    Population,

    #[error("beta (transmission rate) must be finite and non-negative")]
    Beta,

    #[error("gamma (recovery rate) must be finite and non-negative")]
    Gamma,
}

impl ModelParameters {
    /// Creates validated model parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `population` is not positive, or if `beta` or
    /// `gamma` is negative. Non-finite values are rejected as well.
    pub fn new(population: f64, beta: f64, gamma: f64) -> Result<Self, ParameterError> {
        if !population.is_finite() || population <= 0.0 {
            return Err(ParameterError::Population);
        }
        if !beta.is_finite() || beta < 0.0 {
            return Err(ParameterError::Beta);
        }
        if !gamma.is_finite() || gamma < 0.0 {
            return Err(ParameterError::Gamma);
        }

        Ok(Self {
            population,
            beta,
            gamma,
        })
    }

    /// Creates parameters for `population` with the default rates.
    ///
    /// # Errors
    ///
    /// Returns an error if `population` is not finite and positive.
    pub fn with_population(population: f64) -> Result<Self, ParameterError> {
        Self::new(population, DEFAULT_BETA, DEFAULT_GAMMA)
    }

    /// Returns the total population `N`.
    #[must_use]
    pub fn population(&self) -> f64 {
        self.population
    }

    /// Returns the transmission rate `beta`.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Returns the recovery rate `gamma`.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Returns the basic reproduction number `R0 = beta / gamma`.
    ///
    /// Zero when there is no transmission, infinite when nobody recovers.
    #[must_use]
    pub fn basic_reproduction_number(&self) -> f64 {
        if self.beta == 0.0 {
            return 0.0;
        }
        self.beta / self.gamma
    }

    /// Returns the fraction of the population that must be immune for the
    /// epidemic to decline, `1 - 1 / R0`, or 0 when `R0 <= 1`.
    #[must_use]
    pub fn herd_immunity_threshold(&self) -> f64 {
        (1.0 - 1.0 / self.basic_reproduction_number()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_reference_rates() {
        let params = ModelParameters::with_population(1000.0).unwrap();

        assert_relative_eq!(params.population(), 1000.0);
        assert_relative_eq!(params.beta(), 0.2);
        assert_relative_eq!(params.gamma(), 0.1);
    }

    #[test]
    fn rejects_non_positive_population() {
        assert_eq!(
            ModelParameters::new(0.0, 0.2, 0.1),
            Err(ParameterError::Population)
        );
        assert_eq!(
            ModelParameters::new(-5.0, 0.2, 0.1),
            Err(ParameterError::Population)
        );
        assert_eq!(
            ModelParameters::new(f64::INFINITY, 0.2, 0.1),
            Err(ParameterError::Population)
        );
    }

    #[test]
    fn rejects_negative_rates() {
        assert_eq!(
            ModelParameters::new(100.0, -0.1, 0.1),
            Err(ParameterError::Beta)
        );
        assert_eq!(
            ModelParameters::new(100.0, 0.2, -0.1),
            Err(ParameterError::Gamma)
        );
        assert_eq!(
            ModelParameters::new(100.0, f64::NAN, 0.1),
            Err(ParameterError::Beta)
        );
    }

    #[test]
    fn zero_rates_are_allowed() {
        assert!(ModelParameters::new(100.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn reproduction_number_and_threshold() {
        let params = ModelParameters::new(1000.0, 0.2, 0.1).unwrap();

        assert_relative_eq!(params.basic_reproduction_number(), 2.0);
        assert_relative_eq!(params.herd_immunity_threshold(), 0.5);
    }

    #[test]
    fn reproduction_number_edge_cases() {
        let no_transmission = ModelParameters::new(1000.0, 0.0, 0.0).unwrap();
        assert_relative_eq!(no_transmission.basic_reproduction_number(), 0.0);
        assert_relative_eq!(no_transmission.herd_immunity_threshold(), 0.0);

        let no_recovery = ModelParameters::new(1000.0, 0.2, 0.0).unwrap();
        assert!(no_recovery.basic_reproduction_number().is_infinite());
        assert_relative_eq!(no_recovery.herd_immunity_threshold(), 1.0);

        let subcritical = ModelParameters::new(1000.0, 0.05, 0.1).unwrap();
        assert_relative_eq!(subcritical.herd_immunity_threshold(), 0.0);
    }
}
