//! Reusable observers for sirsim solvers.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits that let observers work across solvers
//!   ([`HasStep`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`TraceObserver`]: reports solver events through `tracing`
//! - [`StopWhen`]: stops a solver once a predicate on the event holds
//!
//! # Features
//!
//! - `plot`: Enables [`PlotObserver`] for visualizing trajectories via egui.
//!   This feature adds dependencies on `eframe` and `egui_plot`.
//!
//! [`HasStep`]: traits::HasStep
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod stop;
mod trace;

#[cfg(feature = "plot")]
mod plot;

pub use stop::StopWhen;
pub use trace::TraceObserver;

#[cfg(feature = "plot")]
pub use plot::{PlotObserver, Plottable, ShowConfig};
