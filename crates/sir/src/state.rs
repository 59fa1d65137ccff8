use sirsim_core::StepIntegrable;

/// Compartment sizes at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub susceptible: f64,
    pub infected: f64,
    pub recovered: f64,
}

impl State {
    /// Creates a state from its three compartments.
    #[must_use]
    pub fn new(susceptible: f64, infected: f64, recovered: f64) -> Self {
        Self {
            susceptible,
            infected,
            recovered,
        }
    }

    /// Returns the sum of all compartments.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.susceptible + self.infected + self.recovered
    }

    /// Returns `true` if no compartment is negative.
    ///
    /// RK4 does not guarantee this for large step sizes and rates.
    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        self.susceptible >= 0.0 && self.infected >= 0.0 && self.recovered >= 0.0
    }
}

/// Time derivative of a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rates {
    pub d_susceptible: f64,
    pub d_infected: f64,
    pub d_recovered: f64,
}

impl Rates {
    /// Returns the net rate of change of the population.
    ///
    /// Zero for the SIR system, up to rounding.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.d_susceptible + self.d_infected + self.d_recovered
    }
}

impl StepIntegrable<f64> for State {
    type Derivative = Rates;

    fn step(&self, derivative: Rates, dt: f64) -> Self {
        Self {
            susceptible: self.susceptible + derivative.d_susceptible * dt,
            infected: self.infected + derivative.d_infected * dt,
            recovered: self.recovered + derivative.d_recovered * dt,
        }
    }
}
