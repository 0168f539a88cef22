//! Orbit completion detection
//!
//! [`OrbitTracker`] watches the distance of a sampled point (a particle or a
//! bunch centroid) from a fixed origin. An orbit is counted each time that
//! distance stops shrinking after having shrunk, i.e. once per pass through a
//! local minimum (perigee). It does not measure angle swept, so radial wobble
//! within one revolution can count twice and sampling coarser than the radial
//! oscillation can miss a revolution.

use super::bunch::Bunch;
use super::states::Particle;
use super::vector::Vector;
use crate::error::SimResult;

/// Radial motion relative to the tracked origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialState {
    Converging, // distance fell on the last sample
    Diverging,
}

#[derive(Debug, Clone)]
pub struct OrbitTracker {
    origin: Vector,
    last_distance: f64,
    state: RadialState,
}

impl OrbitTracker {
    pub fn new(origin: Vector) -> Self {
        Self {
            origin,
            last_distance: 0.0,
            state: RadialState::Diverging,
        }
    }

    pub fn origin(&self) -> Vector {
        self.origin
    }

    pub fn last_distance(&self) -> f64 {
        self.last_distance
    }

    pub fn state(&self) -> RadialState {
        self.state
    }

    /// Feed one sample; true when it completes an orbit.
    ///
    /// - d >= last, Converging: orbit completed, now Diverging
    /// - d >= last, Diverging:  stay Diverging
    /// - d <  last:             Converging
    pub fn has_orbited(&mut self, sample: Vector) -> bool {
        let distance = (sample - self.origin).magnitude();

        let completed = if distance >= self.last_distance {
            let was_converging = self.state == RadialState::Converging;
            self.state = RadialState::Diverging;
            was_converging
        } else {
            self.state = RadialState::Converging;
            false
        };

        self.last_distance = distance;
        completed
    }

    /// Track a single particle's position
    pub fn has_particle_orbited(&mut self, particle: &Particle) -> bool {
        self.has_orbited(particle.position())
    }

    /// Track a bunch centroid. Call only after every particle has been
    /// advanced for the step.
    pub fn has_bunch_orbited(&mut self, bunch: &Bunch) -> SimResult<bool> {
        Ok(self.has_orbited(bunch.mean_position()?))
    }
}
