//! Error types for the emsim core.
//!
//! Every failure here is local and synchronous: the caller that triggered it
//! gets it back directly and decides whether the run is over.

use thiserror::Error;

/// Result alias used throughout the crate
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by vector construction, field evaluation, bunch sampling
/// and scenario loading
#[derive(Debug, Error)]
pub enum SimError {
    /// Raw component list was neither 2 nor 3 long
    #[error("vector needs 2 or 3 components, got {len}")]
    InvalidVectorLength { len: usize },

    /// Distribution selector outside {Uniform, Gaussian}
    #[error("unknown distribution '{0}' (expected uniform/U or gaussian/G)")]
    UnknownDistribution(String),

    /// Charge-to-mass ratio requested for a massless particle
    #[error("particle has zero mass; charge/mass is undefined")]
    ZeroMass,

    /// Mass below zero handed to a setter or configuration
    #[error("particle mass must be non-negative, got {mass:e} kg")]
    NegativeMass { mass: f64 },

    /// Statistic requested on a bunch with no particles
    #[error("cannot compute {statistic} of an empty bunch")]
    EmptyBunch { statistic: &'static str },

    /// Attempt to change a constant of a fixed species
    #[error("{species} {property} is a fixed constant and cannot be changed")]
    LockedSpecies {
        species: &'static str,
        property: &'static str,
    },

    /// Sampling parameters rejected by the distribution
    #[error("invalid distribution parameters: {0}")]
    InvalidDistribution(String),

    /// Sampled kinetic energy cannot be turned into a speed
    #[error("sampled kinetic energy {energy:e} J does not give a real speed")]
    NonPhysicalEnergy { energy: f64 },

    /// Scenario configuration could not be turned into a runnable setup
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    /// Create a configuration error with a message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
