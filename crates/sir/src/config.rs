//! Simulation configuration loaded from TOML.
//!
//! ```toml
//! population = 1000.0
//! beta = 0.2
//! gamma = 0.1
//! step_size = 1.0
//! time_steps = 200
//!
//! [initial]
//! infected = 1.0
//! recovered = 0.0
//! ```
//!
//! Only `population` is required.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    DEFAULT_BETA, DEFAULT_GAMMA, DEFAULT_STEP_SIZE, Error, InitialConditions, ModelParameters,
    SirModel,
};

/// Default number of steps for a run.
pub const DEFAULT_TIME_STEPS: usize = 200;

/// A complete description of one simulation run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SirConfig {
    pub population: f64,

    #[serde(default = "default_beta")]
    pub beta: f64,

    #[serde(default = "default_gamma")]
    pub gamma: f64,

    #[serde(default = "default_step_size")]
    pub step_size: f64,

    #[serde(default = "default_time_steps")]
    pub time_steps: usize,

    #[serde(default)]
    pub initial: InitialConditions,
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_beta() -> f64 {
    DEFAULT_BETA
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

fn default_step_size() -> f64 {
    DEFAULT_STEP_SIZE
}

fn default_time_steps() -> usize {
    DEFAULT_TIME_STEPS
}

impl SirConfig {
    /// Creates a configuration for `population` with every other value defaulted.
    #[must_use]
    pub fn new(population: f64) -> Self {
        Self {
            population,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            step_size: DEFAULT_STEP_SIZE,
            time_steps: DEFAULT_TIME_STEPS,
            initial: InitialConditions::default(),
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML, a field has the wrong
    /// type, `population` is missing, or an unknown field is present.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Validates the configuration and builds the model it describes.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter, initial value, or the step size is
    /// invalid.
    pub fn build(&self) -> Result<SirModel, Error> {
        let parameters = ModelParameters::new(self.population, self.beta, self.gamma)?;
        SirModel::with_initial_conditions(parameters, &self.initial)?.with_step_size(self.step_size)
    }
}
