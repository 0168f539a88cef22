//! Ensembles ("bunches") of particles.
//!
//! A [`Bunch`] owns an ordered list of particles, a sampling [`Distribution`]
//! and a seeded RNG used to scatter positions and velocities. Aggregate
//! statistics are computed on demand over the current particles and fail on
//! an empty bunch.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution as _, Normal};
use serde::Deserialize;

use super::states::{by_abs_y, Particle};
use super::vector::Vector;
use crate::error::{SimError, SimResult};

/// Sampling rule for randomized initialization
///
/// The `spread` handed to [`Distribution::sample`] means different things:
/// - `Uniform`: half-width, samples lie in `[mean - spread, mean + spread]`
/// - `Gaussian`: standard deviation
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    #[default]
    #[serde(rename = "uniform", alias = "U")]
    Uniform,

    #[serde(rename = "gaussian", alias = "G")]
    Gaussian,
}

impl Distribution {
    /// Draw one scalar around `mean`. `spread` must be finite and
    /// non-negative for either distribution.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R, mean: f64, spread: f64) -> SimResult<f64> {
        if !(spread.is_finite() && spread >= 0.0) {
            return Err(SimError::InvalidDistribution(format!(
                "{self:?} spread must be finite and non-negative, got {spread}"
            )));
        }
        match self {
            Distribution::Uniform => Ok(mean + rng.gen_range(-1.0..=1.0) * spread),
            Distribution::Gaussian => {
                let normal = Normal::new(mean, spread)
                    .map_err(|e| SimError::InvalidDistribution(format!("sigma {spread}: {e}")))?;
                Ok(normal.sample(rng))
            }
        }
    }

    /// Draw each axis independently around `mean` with the matching `spread` axis
    pub fn sample_vector<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        mean: Vector,
        spread: Vector,
    ) -> SimResult<Vector> {
        Ok(Vector::new(
            self.sample(rng, mean.x(), spread.x())?,
            self.sample(rng, mean.y(), spread.y())?,
            self.sample(rng, mean.z(), spread.z())?,
        ))
    }
}

impl FromStr for Distribution {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s.trim() {
            "U" | "u" | "uniform" => Ok(Distribution::Uniform),
            "G" | "g" | "gaussian" => Ok(Distribution::Gaussian),
            other => Err(SimError::UnknownDistribution(other.to_string())),
        }
    }
}

impl TryFrom<char> for Distribution {
    type Error = SimError;

    fn try_from(code: char) -> SimResult<Self> {
        match code {
            'U' => Ok(Distribution::Uniform),
            'G' => Ok(Distribution::Gaussian),
            other => Err(SimError::UnknownDistribution(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bunch {
    particles: Vec<Particle>,
    distribution: Distribution,
    rng: StdRng,
}

impl Bunch {
    /// Empty bunch with a reproducible RNG
    pub fn new(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Empty bunch drawing from a caller-supplied RNG
    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            distribution: Distribution::default(),
            rng,
        }
    }

    /// Append a particle; insertion order is kept
    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    pub fn set_distribution(&mut self, distribution: Distribution) {
        self.distribution = distribution;
    }

    /// Select the distribution from a text code ("U"/"uniform", "G"/"gaussian")
    pub fn set_distribution_code(&mut self, code: &str) -> SimResult<()> {
        self.distribution = code.parse()?;
        Ok(())
    }

    /// Scatter every particle around `center`, each axis drawn with the
    /// matching `spread` axis
    pub fn set_position(&mut self, center: Vector, spread: Vector) -> SimResult<()> {
        let dist = self.distribution;
        let positions = (0..self.particles.len())
            .map(|_| dist.sample_vector(&mut self.rng, center, spread))
            .collect::<SimResult<Vec<_>>>()?;

        for (p, x) in self.particles.iter_mut().zip(positions) {
            p.set_position(x);
        }
        Ok(())
    }

    /// Give every particle a velocity built from a sampled kinetic energy and
    /// a sampled direction.
    ///
    /// The energy is drawn from `mean_energy`/`energy_spread` and converted to
    /// a speed `sqrt(2E/m)`. The direction is drawn per axis around the unit
    /// vector of `direction` with `direction_spread` and is scaled by that
    /// speed as drawn, without normalising it again.
    pub fn set_velocity(
        &mut self,
        direction: Vector,
        direction_spread: Vector,
        mean_energy: f64,
        energy_spread: f64,
    ) -> SimResult<()> {
        let dist = self.distribution;
        let unit = direction.unit_vector();

        let mut velocities = Vec::with_capacity(self.particles.len());
        for p in &self.particles {
            let mass = p.mass();
            if mass == 0.0 {
                return Err(SimError::ZeroMass);
            }
            if mass < 0.0 {
                return Err(SimError::NegativeMass { mass });
            }
            let energy = dist.sample(&mut self.rng, mean_energy, energy_spread)?;
            let speed = (2.0 * energy / mass).sqrt();
            if !speed.is_finite() {
                return Err(SimError::NonPhysicalEnergy { energy });
            }
            let dir = dist.sample_vector(&mut self.rng, unit, direction_spread)?;
            velocities.push(dir * speed);
        }

        for (p, v) in self.particles.iter_mut().zip(velocities) {
            p.set_velocity(v);
        }
        Ok(())
    }

    fn require_particles(&self, statistic: &'static str) -> SimResult<f64> {
        if self.particles.is_empty() {
            return Err(SimError::EmptyBunch { statistic });
        }
        Ok(self.particles.len() as f64)
    }

    /// Arithmetic mean of positions (the bunch centroid)
    pub fn mean_position(&self) -> SimResult<Vector> {
        let n = self.require_particles("mean position")?;
        Ok(self.particles.iter().map(Particle::position).sum::<Vector>() * (1.0 / n))
    }

    /// Arithmetic mean of velocities
    pub fn mean_velocity(&self) -> SimResult<Vector> {
        let n = self.require_particles("mean velocity")?;
        Ok(self.particles.iter().map(Particle::velocity).sum::<Vector>() * (1.0 / n))
    }

    /// Population standard deviation of position per axis,
    /// sqrt(E[x^2] - E[x]^2)
    pub fn spread_sd(&self) -> SimResult<Vector> {
        let n = self.require_particles("standard deviation")?;

        let mut mean = Vector::zeros();
        let mut mean_sq = Vector::zeros();
        for p in &self.particles {
            let x = p.position();
            mean += x;
            mean_sq += x.multiply(&x);
        }
        mean *= 1.0 / n;
        mean_sq *= 1.0 / n;

        // round-off can push a zero variance slightly negative
        let variance = mean_sq - mean.multiply(&mean);
        Ok(variance.map(|v| v.max(0.0).sqrt()))
    }

    /// Per axis, largest minus smallest position coordinate
    pub fn full_spread(&self) -> SimResult<Vector> {
        self.require_particles("full spread")?;

        let first = self.particles[0].position();
        let (min, max) = self.particles.iter().map(Particle::position).fold(
            (first, first),
            |(lo, hi), x| {
                (
                    Vector::new(lo.x().min(x.x()), lo.y().min(x.y()), lo.z().min(x.z())),
                    Vector::new(hi.x().max(x.x()), hi.y().max(x.y()), hi.z().max(x.z())),
                )
            },
        );
        Ok(max - min)
    }

    /// Per axis, largest |position - mean position| over the particles
    pub fn spread_max(&self) -> SimResult<Vector> {
        let mean = self.mean_position()?;
        Ok(max_abs_deviation(self.particles.iter().map(Particle::position), mean))
    }

    /// Per axis, largest |velocity - mean velocity| over the particles
    pub fn velocity_spread_max(&self) -> SimResult<Vector> {
        let mean = self.mean_velocity()?;
        Ok(max_abs_deviation(self.particles.iter().map(Particle::velocity), mean))
    }

    /// The particle ranked last by `compare`. Among equally ranked particles
    /// the earliest inserted one wins.
    pub fn last_by<F>(&self, mut compare: F) -> SimResult<Particle>
    where
        F: FnMut(&Particle, &Particle) -> Ordering,
    {
        self.particles
            .iter()
            .min_by(|a, b| compare(b, a))
            .cloned()
            .ok_or(SimError::EmptyBunch { statistic: "ranking" })
    }

    /// Copies of the particles in `compare` order (stable)
    pub fn sorted_by<F>(&self, mut compare: F) -> Vec<Particle>
    where
        F: FnMut(&Particle, &Particle) -> Ordering,
    {
        let mut sorted = self.particles.clone();
        sorted.sort_by(|a, b| compare(a, b));
        sorted
    }

    /// y coordinate (signed) of the particle furthest from the xz-plane
    pub fn ranked_by_abs_y(&self) -> SimResult<f64> {
        Ok(self.last_by(by_abs_y)?.position().y())
    }

    /// All summary statistics in one pass over the accessors
    pub fn report(&self) -> SimResult<BunchReport> {
        Ok(BunchReport {
            count: self.len(),
            mean_position: self.mean_position()?,
            mean_velocity: self.mean_velocity()?,
            spread_sd: self.spread_sd()?,
            spread_max: self.spread_max()?,
            full_spread: self.full_spread()?,
            ranked_abs_y: self.ranked_by_abs_y()?,
            velocity_spread_max: self.velocity_spread_max()?,
        })
    }
}

fn max_abs_deviation(values: impl Iterator<Item = Vector>, mean: Vector) -> Vector {
    values.fold(Vector::zeros(), |max, x| {
        let d = (x - mean).map(f64::abs);
        Vector::new(max.x().max(d.x()), max.y().max(d.y()), max.z().max(d.z()))
    })
}

impl<'a> IntoIterator for &'a Bunch {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

impl<'a> IntoIterator for &'a mut Bunch {
    type Item = &'a mut Particle;
    type IntoIter = std::slice::IterMut<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter_mut()
    }
}

/// Snapshot of bunch statistics
#[derive(Debug, Clone, PartialEq)]
pub struct BunchReport {
    pub count: usize,
    pub mean_position: Vector,       // m
    pub mean_velocity: Vector,       // m/s
    pub spread_sd: Vector,           // m
    pub spread_max: Vector,          // m
    pub full_spread: Vector,         // m
    pub ranked_abs_y: f64,           // m
    pub velocity_spread_max: Vector, // m/s
}

impl fmt::Display for BunchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of particles: {}", self.count)?;
        writeln!(f, "Bunch position (m):                 {}", self.mean_position.fixed_width())?;
        writeln!(f, "Bunch velocity (m/s):               {}", self.mean_velocity.fixed_width())?;
        writeln!(f, "Bunch spread (sd in m):             {}", self.spread_sd.fixed_width())?;
        writeln!(f, "Bunch spread (max in m):            {}", self.spread_max.fixed_width())?;
        writeln!(f, "Bunch spread (full in m):           {}", self.full_spread.fixed_width())?;
        writeln!(f, "Bunch spread (y ranked in m):       {:10.6}", self.ranked_abs_y)?;
        write!(f, "Bunch v spread (max in m/s):        {}", self.velocity_spread_max.fixed_width())
    }
}
