//! Human-readable summaries of a simulation run.

use std::fmt;

use crate::{Compartment, SirModel, State, Status, Trajectory};

/// Key figures of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub population: f64,
    pub beta: f64,
    pub gamma: f64,
    pub basic_reproduction_number: f64,
    pub herd_immunity_threshold: f64,
    pub steps: usize,
    pub status: Status,
    pub peak_time: f64,
    pub peak_infected: f64,
    pub final_time: f64,
    pub final_state: State,
    pub max_conservation_error: f64,
    pub non_negative: bool,
}

impl Summary {
    /// Summarizes `trajectory`, which must have been produced by `model`.
    #[must_use]
    pub fn new(model: &SirModel, trajectory: &Trajectory) -> Self {
        let parameters = model.parameters();
        let (peak_index, peak_infected) = trajectory.peak_infected();

        Self {
            population: parameters.population(),
            beta: parameters.beta(),
            gamma: parameters.gamma(),
            basic_reproduction_number: parameters.basic_reproduction_number(),
            herd_immunity_threshold: parameters.herd_immunity_threshold(),
            steps: trajectory.steps(),
            status: trajectory.status(),
            peak_time: trajectory.times()[peak_index],
            peak_infected,
            final_time: trajectory.times()[trajectory.steps()],
            final_state: trajectory.final_state(),
            max_conservation_error: trajectory.max_conservation_error(parameters.population()),
            non_negative: trajectory.iter().all(|(_, state)| state.is_non_negative()),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SIR model: N = {}, beta = {}, gamma = {}",
            self.population, self.beta, self.gamma
        )?;
        writeln!(
            f,
            "  R0 = {:.3}, herd immunity threshold = {:.1}%",
            self.basic_reproduction_number,
            self.herd_immunity_threshold * 100.0
        )?;
        let ending = match self.status {
            Status::Complete => "",
            Status::StoppedByObserver => " (stopped early)",
        };
        writeln!(f, "  steps: {}{ending}", self.steps)?;
        writeln!(
            f,
            "  peak infected: {:.3} at t = {}",
            self.peak_infected, self.peak_time
        )?;
        writeln!(f, "  final state at t = {}:", self.final_time)?;
        for compartment in Compartment::ALL {
            writeln!(
                f,
                "    {:<12} {:.3}",
                compartment.name(),
                compartment.of(&self.final_state)
            )?;
        }
        write!(
            f,
            "  max conservation error: {:.3e}",
            self.max_conservation_error
        )?;
        if !self.non_negative {
            write!(f, "\n  warning: a compartment went negative; try a smaller step size")?;
        }
        Ok(())
    }
}

/// Formats every `every`-th entry of `trajectory` as an aligned table.
///
/// The last entry is always included. An interval of 0 is treated as 1.
#[must_use]
pub fn table(trajectory: &Trajectory, every: usize) -> String {
    let every = every.max(1);
    let last = trajectory.steps();

    let mut out = format!(
        "{:>10} {:>14} {:>14} {:>14}\n",
        "time", "susceptible", "infected", "recovered"
    );
    for (i, (time, state)) in trajectory.iter().enumerate() {
        if i % every == 0 || i == last {
            out.push_str(&format!(
                "{time:>10.2} {:>14.3} {:>14.3} {:>14.3}\n",
                state.susceptible, state.infected, state.recovered
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::ModelParameters;

    fn reference() -> (SirModel, Trajectory) {
        let model = SirModel::new(ModelParameters::with_population(1000.0).unwrap()).unwrap();
        let trajectory = model.simulate(200).unwrap();
        (model, trajectory)
    }

    #[test]
    fn summary_captures_the_reference_epidemic() {
        let (model, trajectory) = reference();

        let summary = Summary::new(&model, &trajectory);

        assert_relative_eq!(summary.basic_reproduction_number, 2.0);
        assert_eq!(summary.steps, 200);
        assert_eq!(summary.status, Status::Complete);
        assert_relative_eq!(summary.final_time, 200.0);
        assert!((60.0..80.0).contains(&summary.peak_time));
        assert!(summary.max_conservation_error < 1e-9);
        assert!(summary.non_negative);
    }

    #[test]
    fn summary_renders_every_compartment() {
        let (model, trajectory) = reference();

        let text = Summary::new(&model, &trajectory).to_string();

        assert!(text.contains("R0 = 2.000"));
        for name in ["susceptible", "infected", "recovered"] {
            assert!(text.contains(name), "missing {name} in:\n{text}");
        }
        assert!(!text.contains("warning"));
    }

    #[test]
    fn table_includes_interval_rows_and_the_last_row() {
        let (_, trajectory) = reference();

        let text = table(&trajectory, 50);
        let rows: Vec<&str> = text.lines().collect();

        // Header, then t = 0, 50, 100, 150, 200.
        assert_eq!(rows.len(), 6);
        assert!(rows[0].contains("infected"));
        assert!(rows[5].trim_start().starts_with("200.00"));
    }
}
