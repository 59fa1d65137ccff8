//! CSV export of simulation trajectories.

use std::{fs::File, io, path::Path};

use serde::Serialize;
use thiserror::Error;

use crate::Trajectory;

/// Errors that can occur while exporting a trajectory.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
struct Row {
    time: f64,
    susceptible: f64,
    infected: f64,
    recovered: f64,
}

/// Writes `trajectory` as CSV with a `time,susceptible,infected,recovered` header.
///
/// # Errors
///
/// Returns an error if a row cannot be written or the writer cannot be flushed.
pub fn write_csv<W: io::Write>(trajectory: &Trajectory, writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    for (time, state) in trajectory.iter() {
        writer.serialize(Row {
            time,
            susceptible: state.susceptible,
            infected: state.infected,
            recovered: state.recovered,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `trajectory` as CSV to a new file at `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_csv(trajectory: &Trajectory, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(trajectory, file)
}
