//! Classical fourth-order Runge-Kutta solver for ODE problems.
//!
//! Each step evaluates the model at four trial states and advances with the
//! weighted average of the resulting slopes:
//!
//! ```text
//! k1 = f(y_n)
//! k2 = f(y_n + dt/2 * k1)
//! k3 = f(y_n + dt/2 * k2)
//! k4 = f(y_n + dt * k3)
//!
//! y_{n+1} = y_n + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
//! ```
//!
//! The whole state is perturbed at every stage, so coupled components always
//! see each other's intermediate values. The weighted sum is formed by chaining
//! [`StepIntegrable::step`] calls, which is why that trait requires steps to
//! compose additively.
//!
//! The step size is fixed. There is no error estimate and no step rejection.
//!
//! # Example
//!
//! ```ignore
//! use sirsim_solvers::transient::rk4;
//!
//! let solution = rk4::solve_unobserved(&model, &problem, initial_input, dt, steps)?;
//!
//! for snapshot in &solution.history {
//!     println!("{:?} -> {:?}", snapshot.input, snapshot.output);
//! }
//! ```

mod action;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use std::ops::Mul;

use sirsim_core::{DerivativeOf, Model, Observer, OdeProblem, Snapshot, StepIntegrable};

/// Integrates an ODE problem with classical RK4.
///
/// # Algorithm
///
/// 1. Call the model with the initial input to get the initial snapshot.
/// 2. For each step:
///    - Compute the four stage derivatives, rebuilding model input and calling
///      the model for each trial state.
///    - Advance the state by the weighted average of the stage derivatives.
///    - Build and finalize the next input, then call the model on it.
///    - Emit an [`Event`] to the observer.
///    - If the observer returns [`Action::StopEarly`], terminate.
/// 3. Return the solution with the full history.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone + Mul<f64, Output = P::Delta>,
    DerivativeOf<P::State, P::Delta>: Clone,
    Obs: Observer<Event<M::Input, M::Output>, Action>,
{
    let initial_output = model.call(&initial).map_err(|err| Error::model(0, err))?;
    let initial_snapshot = Snapshot::new(initial, initial_output);

    let mut history = Vec::with_capacity(steps + 1);
    history.push(initial_snapshot.clone());

    let event = Event {
        step: 0,
        snapshot: initial_snapshot.clone(),
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        tracing::debug!("rk4 stopped by observer before the first step");
        return Ok(Solution {
            status: Status::StoppedByObserver,
            history,
            steps: 0,
        });
    }

    let mut current = initial_snapshot;

    for step in 1..=steps {
        let next = advance(model, problem, &current, &dt, step)?;
        tracing::trace!(step, "rk4 step accepted");

        history.push(next.clone());

        let event = Event {
            step,
            snapshot: next.clone(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            tracing::debug!(step, "rk4 stopped by observer");
            return Ok(Solution {
                status: Status::StoppedByObserver,
                history,
                steps: step,
            });
        }

        current = next;
    }

    tracing::debug!(steps, "rk4 integration complete");

    Ok(Solution {
        status: Status::Complete,
        history,
        steps,
    })
}

/// Integrates an ODE problem with RK4 without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any point.
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    initial: M::Input,
    dt: P::Delta,
    steps: usize,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    M::Input: Clone,
    M::Output: Clone,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone + Mul<f64, Output = P::Delta>,
    DerivativeOf<P::State, P::Delta>: Clone,
{
    solve(model, problem, initial, dt, steps, ())
}

/// Advances a snapshot by a single RK4 step.
///
/// Failures are reported as step 1, the step being computed.
///
/// # Errors
///
/// Returns an error if the model or problem returns an error at any stage.
pub fn step<M, P>(
    model: &M,
    problem: &P,
    current: &Snapshot<M::Input, M::Output>,
    dt: &P::Delta,
) -> Result<Snapshot<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone + Mul<f64, Output = P::Delta>,
    DerivativeOf<P::State, P::Delta>: Clone,
{
    advance(model, problem, current, dt, 1)
}

fn advance<M, P>(
    model: &M,
    problem: &P,
    current: &Snapshot<M::Input, M::Output>,
    dt: &P::Delta,
    step: usize,
) -> Result<Snapshot<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
    P::Delta: Clone + Mul<f64, Output = P::Delta>,
    DerivativeOf<P::State, P::Delta>: Clone,
{
    let input = &current.input;
    let state = problem
        .state(input)
        .map_err(|err| Error::problem(step, err))?;

    let half = dt.clone() * 0.5;

    let k1 = problem
        .derivative(input, &current.output)
        .map_err(|err| Error::problem(step, err))?;
    let k2 = stage(
        model,
        problem,
        input,
        &state.step(k1.clone(), half.clone()),
        &half,
        step,
    )?;
    let k3 = stage(
        model,
        problem,
        input,
        &state.step(k2.clone(), half.clone()),
        &half,
        step,
    )?;
    let k4 = stage(
        model,
        problem,
        input,
        &state.step(k3.clone(), dt.clone()),
        dt,
        step,
    )?;

    // y + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
    let sixth = dt.clone() * (1.0 / 6.0);
    let third = dt.clone() * (1.0 / 3.0);
    let next_state = state
        .step(k1, sixth.clone())
        .step(k2, third.clone())
        .step(k3, third)
        .step(k4, sixth);

    let next_input = problem
        .build_input(input, &next_state, dt)
        .map_err(|err| Error::problem(step, err))?;
    let next_input = problem
        .finalize_step(next_input, input, &current.output, dt)
        .map_err(|err| Error::problem(step, err))?;

    let next_output = model
        .call(&next_input)
        .map_err(|err| Error::model(step, err))?;

    Ok(Snapshot::new(next_input, next_output))
}

/// Evaluates the derivative at a trial state `delta` away from `base`.
fn stage<M, P>(
    model: &M,
    problem: &P,
    base: &M::Input,
    trial: &P::State,
    delta: &P::Delta,
    step: usize,
) -> Result<DerivativeOf<P::State, P::Delta>, Error>
where
    M: Model,
    P: OdeProblem<Input = M::Input, Output = M::Output>,
{
    let input = problem
        .build_input(base, trial, delta)
        .map_err(|err| Error::problem(step, err))?;
    let output = model
        .call(&input)
        .map_err(|err| Error::model(step, err))?;
    problem
        .derivative(&input, &output)
        .map_err(|err| Error::problem(step, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    // --- Test fixtures ---

    /// Position and velocity of a unit harmonic oscillator.
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Phase {
        x: f64,
        v: f64,
    }

    #[derive(Debug, Clone, Copy)]
    struct PhaseRate {
        dx: f64,
        dv: f64,
    }

    impl StepIntegrable<f64> for Phase {
        type Derivative = PhaseRate;

        fn step(&self, derivative: PhaseRate, dt: f64) -> Self {
            Phase {
                x: self.x + derivative.dx * dt,
                v: self.v + derivative.dv * dt,
            }
        }
    }

    #[derive(Debug, Clone)]
    struct Input {
        phase: Phase,
        time: f64,
    }

    /// Linear system `x' = a * x + b * v`, `v' = c * x + d * v`.
    struct Linear {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    }

    impl Linear {
        /// `x' = -x`, with `v` held at zero.
        fn decay() -> Self {
            Self {
                a: -1.0,
                b: 0.0,
                c: 0.0,
                d: 0.0,
            }
        }

        /// `x' = v`, `v' = -x`.
        fn oscillator() -> Self {
            Self {
                a: 0.0,
                b: 1.0,
                c: -1.0,
                d: 0.0,
            }
        }
    }

    impl Model for Linear {
        type Input = Input;
        type Output = PhaseRate;
        type Error = Infallible;

        fn call(&self, input: &Input) -> Result<PhaseRate, Infallible> {
            let Phase { x, v } = input.phase;
            Ok(PhaseRate {
                dx: self.a * x + self.b * v,
                dv: self.c * x + self.d * v,
            })
        }
    }

    struct LinearProblem;

    impl OdeProblem for LinearProblem {
        type Input = Input;
        type Output = PhaseRate;
        type Delta = f64;
        type State = Phase;
        type Error = Infallible;

        fn state(&self, input: &Input) -> Result<Phase, Infallible> {
            Ok(input.phase)
        }

        fn derivative(&self, _input: &Input, output: &PhaseRate) -> Result<PhaseRate, Infallible> {
            Ok(*output)
        }

        fn build_input(&self, base: &Input, state: &Phase, dt: &f64) -> Result<Input, Infallible> {
            Ok(Input {
                phase: *state,
                time: base.time + dt,
            })
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("position {0} out of range")]
    struct OutOfRange(f64);

    /// Moves at unit speed and refuses to evaluate beyond `limit`.
    struct Bounded {
        limit: f64,
    }

    impl Model for Bounded {
        type Input = Input;
        type Output = PhaseRate;
        type Error = OutOfRange;

        fn call(&self, input: &Input) -> Result<PhaseRate, OutOfRange> {
            if input.phase.x > self.limit {
                return Err(OutOfRange(input.phase.x));
            }
            Ok(PhaseRate { dx: 1.0, dv: 0.0 })
        }
    }

    fn start(x: f64, v: f64) -> Input {
        Input {
            phase: Phase { x, v },
            time: 0.0,
        }
    }

    fn final_x(model: &Linear, dt: f64, steps: usize) -> f64 {
        let solution = solve_unobserved(model, &LinearProblem, start(1.0, 0.0), dt, steps)
            .expect("should solve");
        solution.last().input.phase.x
    }

    // --- Tests ---

    #[test]
    fn single_step_matches_fourth_order_taylor_polynomial() {
        let model = Linear::decay();
        let initial = start(1.0, 0.0);
        let output = model.call(&initial).unwrap();
        let h: f64 = 0.1;

        let next = step(&model, &LinearProblem, &Snapshot::new(initial, output), &h)
            .expect("should step");

        let taylor = 1.0 - h + h.powi(2) / 2.0 - h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert_relative_eq!(next.input.phase.x, taylor, max_relative = 1e-12);
        assert_relative_eq!(next.input.time, h);
    }

    #[test]
    fn exponential_decay_tracks_analytic_solution() {
        let x = final_x(&Linear::decay(), 0.1, 10);

        assert_relative_eq!(x, (-1.0_f64).exp(), max_relative = 1e-5);
    }

    #[test]
    fn global_error_shrinks_at_fourth_order() {
        let model = Linear::decay();
        let exact = (-1.0_f64).exp();

        let coarse = (final_x(&model, 0.1, 10) - exact).abs();
        let fine = (final_x(&model, 0.05, 20) - exact).abs();

        let ratio = coarse / fine;
        assert!((14.0..18.0).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn coupled_components_are_advanced_jointly() {
        let model = Linear::oscillator();

        let solution = solve_unobserved(&model, &LinearProblem, start(1.0, 0.0), 0.1, 100)
            .expect("should solve");

        let end = &solution.last().input;
        assert_relative_eq!(end.time, 10.0, max_relative = 1e-12);
        assert_relative_eq!(end.phase.x, 10.0_f64.cos(), epsilon = 1e-4);
        assert_relative_eq!(end.phase.v, -(10.0_f64.sin()), epsilon = 1e-4);
    }

    #[test]
    fn history_holds_initial_plus_every_step() {
        let solution = solve_unobserved(&Linear::decay(), &LinearProblem, start(1.0, 0.0), 0.5, 8)
            .expect("should solve");

        assert_eq!(solution.status, Status::Complete);
        assert_eq!(solution.steps, 8);
        assert_eq!(solution.history.len(), 9);
        assert_relative_eq!(solution.history[0].input.phase.x, 1.0);
    }

    #[test]
    fn zero_steps_returns_initial() {
        let solution = solve_unobserved(&Linear::decay(), &LinearProblem, start(5.0, 0.0), 0.1, 0)
            .expect("should return initial");

        assert_eq!(solution.status, Status::Complete);
        assert_eq!(solution.steps, 0);
        assert_eq!(solution.history.len(), 1);
        assert_relative_eq!(solution.history[0].input.phase.x, 5.0);
    }

    #[test]
    fn observer_can_stop_early() {
        let observer = |event: &Event<Input, PhaseRate>| {
            (event.step >= 5).then_some(Action::StopEarly)
        };

        let solution = solve(
            &Linear::decay(),
            &LinearProblem,
            start(1.0, 0.0),
            0.1,
            100,
            observer,
        )
        .expect("should stop early");

        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.steps, 5);
        assert_eq!(solution.history.len(), 6);
    }

    #[test]
    fn observer_sees_only_accepted_steps() {
        let mut seen = Vec::new();
        solve(
            &Linear::decay(),
            &LinearProblem,
            start(1.0, 0.0),
            0.25,
            4,
            |event: &Event<Input, PhaseRate>| {
                seen.push((event.step, event.snapshot.input.time));
                None
            },
        )
        .expect("should solve");

        assert_eq!(
            seen,
            vec![(0, 0.0), (1, 0.25), (2, 0.5), (3, 0.75), (4, 1.0)]
        );
    }

    #[test]
    fn model_failure_reports_the_failing_step() {
        // Unit speed from zero: step 3 ends at x = 3 and trips the limit.
        let model = Bounded { limit: 2.5 };

        let err = solve_unobserved(&model, &LinearProblem, start(0.0, 0.0), 1.0, 10)
            .expect_err("should fail");

        assert!(matches!(err, Error::Model { .. }));
        assert_eq!(err.step(), 3);
    }

    #[test]
    fn invalid_initial_input_fails_at_step_zero() {
        let model = Bounded { limit: 0.0 };

        let err = solve_unobserved(&model, &LinearProblem, start(1.0, 0.0), 1.0, 10)
            .expect_err("should fail");

        assert_eq!(err.step(), 0);
    }
}
