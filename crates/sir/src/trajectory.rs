use sirsim_solvers::transient::rk4::{Solution, Status};

use crate::{Rates, SirInput, State};

/// The time series produced by one simulation run.
///
/// Every sequence has one entry per accepted step plus the initial state, so
/// index `i` holds the state after `i` steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    susceptible: Vec<f64>,
    infected: Vec<f64>,
    recovered: Vec<f64>,
    status: Status,
}

impl Trajectory {
    pub(crate) fn from_solution(solution: &Solution<SirInput, Rates>) -> Self {
        let len = solution.history.len();
        let mut trajectory = Self {
            times: Vec::with_capacity(len),
            susceptible: Vec::with_capacity(len),
            infected: Vec::with_capacity(len),
            recovered: Vec::with_capacity(len),
            status: solution.status,
        };

        for snapshot in &solution.history {
            let SirInput { state, time } = snapshot.input;
            trajectory.times.push(time);
            trajectory.susceptible.push(state.susceptible);
            trajectory.infected.push(state.infected);
            trajectory.recovered.push(state.recovered);
        }

        trajectory
    }

    /// Returns the number of entries, which is the number of steps plus one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false`: a trajectory holds at least the initial state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the number of integration steps completed.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.len() - 1
    }

    /// Returns how the run terminated.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[must_use]
    pub fn susceptible(&self) -> &[f64] {
        &self.susceptible
    }

    #[must_use]
    pub fn infected(&self) -> &[f64] {
        &self.infected
    }

    #[must_use]
    pub fn recovered(&self) -> &[f64] {
        &self.recovered
    }

    /// Returns the state at index `i`, or `None` if out of range.
    #[must_use]
    pub fn state(&self, i: usize) -> Option<State> {
        Some(State::new(
            *self.susceptible.get(i)?,
            *self.infected.get(i)?,
            *self.recovered.get(i)?,
        ))
    }

    /// Iterates over `(time, state)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, State)> + '_ {
        (0..self.len()).map(|i| {
            let state = State::new(self.susceptible[i], self.infected[i], self.recovered[i]);
            (self.times[i], state)
        })
    }

    #[must_use]
    pub fn initial_state(&self) -> State {
        self.state_unchecked(0)
    }

    #[must_use]
    pub fn final_state(&self) -> State {
        self.state_unchecked(self.steps())
    }

    /// Returns the index and value of the largest infected count.
    ///
    /// Ties resolve to the earliest index.
    #[must_use]
    pub fn peak_infected(&self) -> (usize, f64) {
        self.infected
            .iter()
            .copied()
            .enumerate()
            .fold((0, self.infected[0]), |peak, (i, value)| {
                if value > peak.1 { (i, value) } else { peak }
            })
    }

    /// Returns the largest relative deviation of `S + I + R` from `population`.
    #[must_use]
    pub fn max_conservation_error(&self, population: f64) -> f64 {
        self.iter()
            .map(|(_, state)| ((state.total() - population) / population).abs())
            .fold(0.0, f64::max)
    }

    fn state_unchecked(&self, i: usize) -> State {
        State::new(self.susceptible[i], self.infected[i], self.recovered[i])
    }
}
