//! Plotting support for SIR runs (feature `plot`).

use sirsim_core::Observer;
use sirsim_observers::{PlotObserver, Plottable};
use sirsim_solvers::transient::rk4;

use crate::{SirInput, Trajectory};

/// Trace names, in the order [`SirInput`] reports its compartments.
pub const TRACES: [&str; 3] = ["Infected", "Recovered", "Susceptible"];

impl Plottable<3> for SirInput {
    fn x(&self) -> Option<f64> {
        Some(self.time)
    }

    fn traces(&self) -> [Option<f64>; 3] {
        [
            Some(self.state.infected),
            Some(self.state.recovered),
            Some(self.state.susceptible),
        ]
    }
}

/// Builds a [`PlotObserver`] holding every entry of `trajectory`.
#[must_use]
pub fn observer(trajectory: &Trajectory) -> PlotObserver<3> {
    let mut obs = PlotObserver::new(TRACES);
    for (time, state) in trajectory.iter() {
        let _: Option<rk4::Action> = obs.observe(&SirInput { state, time });
    }
    obs
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{ModelParameters, SirModel};

    #[test]
    fn observer_holds_one_point_per_entry() {
        let model = SirModel::new(ModelParameters::with_population(1000.0).unwrap()).unwrap();
        let trajectory = model.with_step_size(0.5).unwrap().simulate(10).unwrap();

        let obs = observer(&trajectory);

        for trace in 0..3 {
            assert_eq!(obs.points(trace).len(), 11);
        }
        assert_eq!(obs.points(0)[0], [0.0, 1.0]);
        assert_eq!(obs.points(1)[0], [0.0, 0.0]);
        assert_eq!(obs.points(2)[0], [0.0, 999.0]);
        assert_eq!(obs.points(0)[10], [5.0, trajectory.infected()[10]]);
    }
}
