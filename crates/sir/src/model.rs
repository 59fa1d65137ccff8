use std::convert::Infallible;

use sirsim_core::{Model, Observer, OdeProblem, Snapshot};
use sirsim_solvers::transient::rk4;

use crate::{Error, InitialConditions, ModelParameters, Rates, State, Trajectory};

/// Default integration step, one unit of time (a day).
pub const DEFAULT_STEP_SIZE: f64 = 1.0;

/// An SIR epidemic model integrated with fixed-step RK4.
///
/// Holds the immutable parameters, the initial state, and the step size. The
/// model is `Copy`, so independent runs never share mutable data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SirModel {
    parameters: ModelParameters,
    initial: State,
    step_size: f64,
}

/// Model input: the compartments and the time they describe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SirInput {
    pub state: State,
    pub time: f64,
}

impl SirModel {
    /// Creates a model seeded with a single infection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InitialCondition`] with
    /// [`InitialConditionError::ExceedsPopulation`](crate::InitialConditionError::ExceedsPopulation)
    /// if the population is below 1, since the default seed of one infected
    /// person would leave a negative susceptible count.
    pub fn new(parameters: ModelParameters) -> Result<Self, Error> {
        Self::with_initial_conditions(parameters, &InitialConditions::default())
    }

    /// Creates a model with explicit initial compartment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the overrides cannot be resolved; see
    /// [`InitialConditions::resolve`].
    pub fn with_initial_conditions(
        parameters: ModelParameters,
        initial: &InitialConditions,
    ) -> Result<Self, Error> {
        let initial = initial.resolve(&parameters)?;
        Ok(Self {
            parameters,
            initial,
            step_size: DEFAULT_STEP_SIZE,
        })
    }

    /// Returns a copy of this model that integrates with step size `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepSize`] if `dt` is not finite and positive.
    pub fn with_step_size(self, dt: f64) -> Result<Self, Error> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::StepSize(dt));
        }
        Ok(Self {
            step_size: dt,
            ..self
        })
    }

    /// Returns the model parameters.
    #[must_use]
    pub fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    /// Returns the initial state.
    #[must_use]
    pub fn initial_state(&self) -> State {
        self.initial
    }

    /// Returns the integration step size.
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Computes the instantaneous rate of change of every compartment.
    ///
    /// The three rates cancel exactly in real arithmetic for any input,
    /// including zero or negative compartments.
    #[must_use]
    pub fn derivative(&self, state: &State) -> Rates {
        let n = self.parameters.population();
        let beta = self.parameters.beta();
        let gamma = self.parameters.gamma();

        let infections = beta * state.susceptible * state.infected / n;
        let recoveries = gamma * state.infected;

        Rates {
            d_susceptible: -infections,
            d_infected: infections - recoveries,
            d_recovered: recoveries,
        }
    }

    /// Advances `state` by one RK4 step of [`step_size`](Self::step_size).
    ///
    /// All three compartments are stepped together using shared stage slopes.
    ///
    /// # Panics
    ///
    /// Never in practice: [`SirModel`] and [`SirProblem`] both use
    /// [`Infallible`] errors, so the solver's error arm cannot be reached.
    #[must_use]
    pub fn simulate_step(&self, state: &State) -> State {
        let input = SirInput {
            state: *state,
            time: 0.0,
        };
        let current = Snapshot::new(input, self.derivative(state));

        match rk4::step(self, &SirProblem, &current, &self.step_size) {
            Ok(next) => next.input.state,
            // Both the model and the problem have `Infallible` errors.
            Err(err) => unreachable!("SIR evaluation cannot fail: {err}"),
        }
    }

    /// Runs the model for `time_steps` steps from the initial state.
    ///
    /// The returned trajectory has `time_steps + 1` entries; entry 0 is the
    /// initial state and `simulate(0)` returns only that entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Solver`] if integration fails.
    pub fn simulate(&self, time_steps: usize) -> Result<Trajectory, Error> {
        self.simulate_observed(time_steps, ())
    }

    /// Runs the model like [`simulate`](Self::simulate), reporting each
    /// accepted step to `observer`.
    ///
    /// If the observer returns [`rk4::Action::StopEarly`], the trajectory ends
    /// at that step and reports [`rk4::Status::StoppedByObserver`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Solver`] if integration fails.
    pub fn simulate_observed<Obs>(&self, time_steps: usize, observer: Obs) -> Result<Trajectory, Error>
    where
        Obs: Observer<rk4::Event<SirInput, Rates>, rk4::Action>,
    {
        let initial = SirInput {
            state: self.initial,
            time: 0.0,
        };

        let solution = rk4::solve(
            self,
            &SirProblem,
            initial,
            self.step_size,
            time_steps,
            observer,
        )?;

        let trajectory = Trajectory::from_solution(&solution);
        tracing::debug!(
            requested = time_steps,
            completed = trajectory.steps(),
            status = ?trajectory.status(),
            "sir simulation finished"
        );

        Ok(trajectory)
    }
}

impl Model for SirModel {
    type Input = SirInput;
    type Output = Rates;
    type Error = Infallible;

    fn call(&self, input: &SirInput) -> Result<Rates, Infallible> {
        Ok(self.derivative(&input.state))
    }
}

/// ODE problem that integrates the compartments of an [`SirModel`] over time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SirProblem;

impl OdeProblem for SirProblem {
    type Input = SirInput;
    type Output = Rates;
    type Delta = f64;
    type State = State;
    type Error = Infallible;

    fn state(&self, input: &SirInput) -> Result<State, Infallible> {
        Ok(input.state)
    }

    fn derivative(&self, _input: &SirInput, output: &Rates) -> Result<Rates, Infallible> {
        Ok(*output)
    }

    fn build_input(&self, base: &SirInput, state: &State, dt: &f64) -> Result<SirInput, Infallible> {
        Ok(SirInput {
            state: *state,
            time: base.time + dt,
        })
    }
}
