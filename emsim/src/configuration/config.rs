//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator and bunch sampling distribution
//! - [`ParametersConfig`] – step size, loop limits, seed, output cadence
//! - [`FieldConfig`]      – superposed electromagnetic field sources
//! - [`BunchConfig`]      – optional randomly initialised bunch
//! - [`ParticleConfig`]   – optional explicitly placed particles
//! - [`OutputConfig`]     – optional trajectory file
//!
//! # YAML format
//! A proton bunch circulating in a cyclotron magnet with a 10% field error:
//!
//! ```yaml
//! engine:
//!   integrator: "semi_implicit_euler"   # or "explicit_euler"
//!   distribution: "uniform"             # or "gaussian" ("U" / "G" accepted)
//!
//! parameters:
//!   time_step: 1.0e-5
//!   max_time: 3000.0
//!   max_revolutions: 1000
//!   sample_every: 1000
//!   seed: 42
//!   spread_tolerance: 0.1
//!
//! field:
//!   - kind: cyclotron
//!     b_positive_x: 1.0e-7
//!     b_negative_x: 0.9e-7
//!
//! bunch:
//!   species: "proton"
//!   count: 100
//!   position: [0.0, 0.0, 0.0]
//!   position_spread: [0.1, 0.0, 0.0]
//!   direction: [0.0, 1.0, 0.0]
//!   direction_spread: [0.0, 0.0, 0.0]
//!   speed: 0.1
//!   energy_spread: 0.0
//!
//! output:
//!   trajectory: "bunch.data"
//! ```
//!
//! Raw vectors are plain lists and are validated when the scenario is built,
//! so a list of the wrong length is reported rather than zero-filled.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SimResult;
use crate::output::trajectory::RowFormat;
use crate::simulation::bunch::Distribution;
use crate::simulation::integrator::Integrator;
use crate::simulation::states::SpeciesKind;

fn zero3() -> Vec<f64> {
    vec![0.0, 0.0, 0.0]
}

fn one() -> u64 {
    1
}

/// Engine selectors
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub integrator: Integrator, // scheme applied to every particle
    #[serde(default)]
    pub distribution: Distribution, // sampling rule for bunch initialisation
}

/// Global numerical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub time_step: f64, // s
    pub max_time: f64, // s
    pub max_revolutions: u32,
    #[serde(default = "one")]
    pub sample_every: u64, // steps between trajectory rows
    #[serde(default)]
    pub seed: u64, // deterministic seed to make runs reproducible
    #[serde(default)]
    pub spread_tolerance: Option<f64>,
    #[serde(default = "zero3")]
    pub orbit_origin: Vec<f64>,
}

/// One field source; all listed sources are superposed
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind")]
pub enum FieldConfig {
    #[serde(rename = "uniform")]
    Uniform {
        #[serde(default = "zero3")]
        electric: Vec<f64>, // V/m
        #[serde(default = "zero3")]
        magnetic: Vec<f64>, // T
    },

    #[serde(rename = "cyclotron")] // B along +z, different magnitude either side of x = 0
    Cyclotron { b_positive_x: f64, b_negative_x: f64 },

    #[serde(rename = "oscillating_electric")] // E = amplitude sin(w t) along direction
    OscillatingElectric {
        amplitude: f64,
        angular_frequency: f64,
        #[serde(default = "unit_y")]
        direction: Vec<f64>,
    },
}

fn unit_y() -> Vec<f64> {
    vec![0.0, 1.0, 0.0]
}

/// Randomly initialised bunch of identical particles
#[derive(Deserialize, Debug, Clone)]
pub struct BunchConfig {
    #[serde(default)]
    pub species: SpeciesKind,
    pub count: usize,
    pub mass: Option<f64>, // kg, required for generic, ignored for protons
    pub charge: Option<f64>, // C, ignored for protons
    #[serde(default = "zero3")]
    pub position: Vec<f64>, // nominal centre
    #[serde(default = "zero3")]
    pub position_spread: Vec<f64>, // half-width (uniform) or sigma (gaussian) per axis
    pub direction: Vec<f64>, // nominal direction of motion
    #[serde(default = "zero3")]
    pub direction_spread: Vec<f64>, // spread applied to the unit direction
    pub speed: f64, // nominal speed; mean energy = 1/2 m speed^2
    #[serde(default)]
    pub energy_spread: f64, // fraction of the mean energy
}

/// Explicitly placed particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    #[serde(default)]
    pub species: SpeciesKind,
    pub mass: Option<f64>,
    pub charge: Option<f64>,
    #[serde(default = "zero3")]
    pub position: Vec<f64>,
    #[serde(default = "zero3")]
    pub velocity: Vec<f64>,
}

/// Trajectory output
#[derive(Deserialize, Debug, Clone, Default)]
pub struct OutputConfig {
    pub trajectory: Option<PathBuf>,
    #[serde(default)]
    pub format: RowFormat,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub field: Vec<FieldConfig>,
    pub bunch: Option<BunchConfig>,
    #[serde(default)]
    pub particles: Vec<ParticleConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
