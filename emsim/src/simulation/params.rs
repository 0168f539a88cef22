//! Numerical parameters for a run
//!
//! `Parameters` holds runtime settings:
//! - fixed step size and the time / revolution limits of the loop,
//! - how often trajectory rows are written,
//! - RNG seed and the optional spread-equality stop tolerance

use super::vector::Vector;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub time_step: f64, // dt (s)
    pub max_time: f64, // stop once simulated time reaches this (s)
    pub max_revolutions: u32, // stop after this many detected orbits
    pub sample_every: u64, // write a trajectory row every n steps
    pub seed: u64, // deterministic seed
    pub spread_tolerance: Option<f64>, // stop when x/y max spreads agree within this fraction
    pub orbit_origin: Vector, // reference point for orbit detection
}
