//! Command-line front end for the SIR simulation.
//!
//! ```text
//! sirsim -N 1000
//! sirsim -N 1000 --beta 0.3 --gamma 0.1 -t 365 --csv sir.csv
//! sirsim --config scenario.toml --step-size 0.25 --table 10
//! sirsim -N 1000 --plot          # requires the `plot` feature
//! ```
//!
//! Set `RUST_LOG` (or pass `-v`) to see solver events.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use sirsim::{
    Rates, SirInput, SirModel, Trajectory,
    config::SirConfig,
    export,
    report::{self, Summary},
};
use sirsim_core::Observer;
use sirsim_observers::{StopWhen, TraceObserver};
use sirsim_solvers::transient::rk4;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sirsim", version, about = "Simulate an SIR epidemic with fixed-step RK4")]
struct Args {
    /// TOML file describing the run; other flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total population size (required without --config).
    #[arg(short = 'N', long, allow_negative_numbers = true)]
    population: Option<f64>,

    /// Transmission rate.
    #[arg(long, allow_negative_numbers = true)]
    beta: Option<f64>,

    /// Recovery rate.
    #[arg(long, allow_negative_numbers = true)]
    gamma: Option<f64>,

    /// Initial susceptible count (defaults to N - infected - recovered).
    #[arg(long, allow_negative_numbers = true)]
    susceptible: Option<f64>,

    /// Initial infected count.
    #[arg(long, allow_negative_numbers = true)]
    infected: Option<f64>,

    /// Initial recovered count.
    #[arg(long, allow_negative_numbers = true)]
    recovered: Option<f64>,

    /// Integration step size.
    #[arg(long, allow_negative_numbers = true)]
    step_size: Option<f64>,

    /// Number of steps to simulate.
    #[arg(short = 't', long)]
    time_steps: Option<usize>,

    /// Stop once the infected count falls below this value after its peak.
    #[arg(long)]
    stop_below: Option<f64>,

    /// Write the trajectory to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print every Nth row of the trajectory.
    #[arg(long, value_name = "N")]
    table: Option<usize>,

    /// Open a window plotting the trajectory (requires the `plot` feature).
    #[arg(long)]
    plot: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = resolve_config(&args)?;
    let model = config.build().context("invalid simulation parameters")?;
    tracing::info!(
        population = config.population,
        beta = config.beta,
        gamma = config.gamma,
        step_size = config.step_size,
        time_steps = config.time_steps,
        "starting simulation"
    );

    let trajectory = run(&model, config.time_steps, args.stop_below)?;

    println!("{}", Summary::new(&model, &trajectory));
    if let Some(every) = args.table {
        print!("\n{}", report::table(&trajectory, every));
    }

    if let Some(path) = &args.csv {
        export::save_csv(&trajectory, path)
            .with_context(|| format!("could not write {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = trajectory.len(), "wrote csv");
    }

    if args.plot {
        plot(&model, &trajectory)?;
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file, if any, and applies command-line overrides.
fn resolve_config(args: &Args) -> Result<SirConfig> {
    let mut config = match (&args.config, args.population) {
        (Some(path), _) => SirConfig::load(path)?,
        (None, Some(population)) => SirConfig::new(population),
        (None, None) => anyhow::bail!("either --population or --config is required"),
    };

    if let Some(population) = args.population {
        config.population = population;
    }
    if let Some(beta) = args.beta {
        config.beta = beta;
    }
    if let Some(gamma) = args.gamma {
        config.gamma = gamma;
    }
    if let Some(step_size) = args.step_size {
        config.step_size = step_size;
    }
    if let Some(time_steps) = args.time_steps {
        config.time_steps = time_steps;
    }
    if args.susceptible.is_some() {
        config.initial.susceptible = args.susceptible;
    }
    if args.infected.is_some() {
        config.initial.infected = args.infected;
    }
    if args.recovered.is_some() {
        config.initial.recovered = args.recovered;
    }

    Ok(config)
}

fn run(model: &SirModel, time_steps: usize, stop_below: Option<f64>) -> Result<Trajectory> {
    let mut trace = TraceObserver::new("sir").every(10);
    let mut stop = stop_below.map(stop_after_peak);

    let trajectory = model.simulate_observed(time_steps, |event: &rk4::Event<SirInput, Rates>| {
        let _: Option<rk4::Action> = trace.observe(event);
        stop.as_mut().and_then(|stop| stop.observe(event))
    })?;

    tracing::debug!(events = trace.reported(), "trace observer finished");
    Ok(trajectory)
}

/// Stops the run once the infected count is below `threshold` and under its
/// running peak, so the growth phase is never cut short.
fn stop_after_peak(
    threshold: f64,
) -> StopWhen<impl FnMut(&rk4::Event<SirInput, Rates>) -> bool> {
    let mut peak = f64::NEG_INFINITY;
    StopWhen::new(move |event: &rk4::Event<SirInput, Rates>| {
        let infected = event.snapshot.input.state.infected;
        peak = peak.max(infected);
        infected < peak && infected < threshold
    })
}

#[cfg(feature = "plot")]
fn plot(model: &SirModel, trajectory: &Trajectory) -> Result<()> {
    use sirsim_observers::ShowConfig;

    let obs = sirsim::plot::observer(trajectory);
    let parameters = model.parameters();
    obs.show(
        ShowConfig::new()
            .title(format!(
                "SIR Model with γ={} and β={}",
                parameters.gamma(),
                parameters.beta()
            ))
            .x_label("Time (days)")
            .y_label("Number of People")
            .legend(),
    )
    .map_err(|err| anyhow::anyhow!("could not open plot window: {err}"))
}

#[cfg(not(feature = "plot"))]
fn plot(_model: &SirModel, _trajectory: &Trajectory) -> Result<()> {
    anyhow::bail!("sirsim was built without the `plot` feature")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use approx::assert_relative_eq;
    use sirsim::{ModelParameters, Status};

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sirsim").chain(argv.iter().copied())).unwrap()
    }

    fn reference_model() -> SirModel {
        SirModel::new(ModelParameters::with_population(1000.0).unwrap()).unwrap()
    }

    #[test]
    fn stop_below_waits_for_the_peak() {
        let trajectory = run(&reference_model(), 200, Some(5.0)).unwrap();
        let (peak_index, peak) = trajectory.peak_infected();
        let last = trajectory.steps();

        assert_eq!(trajectory.status(), Status::StoppedByObserver);
        assert!(peak > 150.0, "peak of {peak}");
        assert!(last > peak_index);
        assert!(trajectory.infected()[last] < 5.0);
        assert!(trajectory.infected()[last - 1] >= 5.0);
    }

    #[test]
    fn threshold_above_the_seed_does_not_stop_the_growth_phase() {
        let trajectory = run(&reference_model(), 200, Some(1e9)).unwrap();
        let (peak_index, peak) = trajectory.peak_infected();

        assert_eq!(trajectory.status(), Status::StoppedByObserver);
        assert!(peak > 150.0, "peak of {peak}");
        assert_eq!(trajectory.steps(), peak_index + 1);
    }

    #[test]
    fn without_stop_below_the_run_completes() {
        let trajectory = run(&reference_model(), 200, None).unwrap();

        assert_eq!(trajectory.status(), Status::Complete);
        assert_eq!(trajectory.steps(), 200);
    }

    #[test]
    fn flags_alone_describe_a_run() {
        let config = resolve_config(&args(&["-N", "500", "--beta", "0.3", "-t", "40"])).unwrap();

        assert_relative_eq!(config.population, 500.0);
        assert_relative_eq!(config.beta, 0.3);
        assert_relative_eq!(config.gamma, sirsim::DEFAULT_GAMMA);
        assert_eq!(config.time_steps, 40);
        assert_eq!(config.initial, sirsim::InitialConditions::default());
    }

    #[test]
    fn population_or_config_is_required() {
        let err = resolve_config(&args(&["--beta", "0.3"])).unwrap_err();

        assert!(err.to_string().contains("--population"));
    }

    #[test]
    fn flags_override_config_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "population = 1000.0\nbeta = 0.2\ntime_steps = 50\n\n[initial]\ninfected = 3.0\nrecovered = 2.0"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config =
            resolve_config(&args(&["--config", path, "--beta", "0.4", "--infected", "7"])).unwrap();

        assert_relative_eq!(config.population, 1000.0);
        assert_relative_eq!(config.beta, 0.4);
        assert_eq!(config.time_steps, 50);
        assert_eq!(config.initial.infected, Some(7.0));
        assert_eq!(config.initial.recovered, Some(2.0));
        assert_eq!(config.initial.susceptible, None);
    }
}
