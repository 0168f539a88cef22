//! Kinematic state of a single massive, possibly charged particle.
//!
//! A particle's mass and charge come from its [`Species`]:
//! - `Species::Generic` carries freely settable mass and charge
//! - `Species::Proton` carries the fixed proton constants; they cannot be
//!   changed after construction
//!
//! Position, velocity and the stored acceleration are [`Vector`] values owned
//! by the particle and only handed out by copy.

use std::cmp::Ordering;

use serde::Deserialize;

use super::integrator::Integrator;
use super::vector::Vector;
use crate::error::{SimError, SimResult};

/// Proton rest mass in kilograms
pub const PROTON_MASS: f64 = 1.67262178e-27;

/// Proton charge in Coulombs
pub const PROTON_CHARGE: f64 = 1.60217657e-19;

/// Species selector used by configuration
/// `species: "generic"` or `species: "proton"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeciesKind {
    #[default]
    #[serde(rename = "generic")]
    Generic,

    #[serde(rename = "proton")]
    Proton,
}

/// Mass/charge table of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Species {
    Generic { mass: f64, charge: f64 }, // kg, C
    Proton,
}

impl Species {
    pub fn generic(mass: f64, charge: f64) -> Self {
        Species::Generic { mass, charge }
    }

    /// Like [`Species::generic`] but rejects a negative mass
    pub fn checked_generic(mass: f64, charge: f64) -> SimResult<Self> {
        check_mass(mass)?;
        Ok(Species::generic(mass, charge))
    }

    /// Resolve a species from a selector and requested constants.
    /// A proton ignores whatever mass and charge were asked for.
    pub fn resolve(kind: SpeciesKind, mass: f64, charge: f64) -> Self {
        match kind {
            SpeciesKind::Generic => Species::generic(mass, charge),
            SpeciesKind::Proton => Species::Proton,
        }
    }

    pub fn mass(&self) -> f64 {
        match *self {
            Species::Generic { mass, .. } => mass,
            Species::Proton => PROTON_MASS,
        }
    }

    pub fn charge(&self) -> f64 {
        match *self {
            Species::Generic { charge, .. } => charge,
            Species::Proton => PROTON_CHARGE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Generic { .. } => "generic",
            Species::Proton => "proton",
        }
    }

    /// Fixed species never change mass or charge
    pub fn is_locked(&self) -> bool {
        matches!(self, Species::Proton)
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    species: Species,
    position: Vector,     // m
    velocity: Vector,     // m/s
    acceleration: Vector, // m/s^2, the field felt last, not the current force
    integrator: Integrator,
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Particle {
    /// Neutral particle at rest at the origin. The mass is taken as given;
    /// [`Particle::set_mass`] and scenario loading reject negative values.
    pub fn new(mass: f64) -> Self {
        Self::with_species(Species::generic(mass, 0.0))
    }

    /// Charged particle at rest at the origin
    pub fn charged(mass: f64, charge: f64) -> Self {
        Self::with_species(Species::generic(mass, charge))
    }

    /// Proton at rest at the origin
    pub fn proton() -> Self {
        Self::with_species(Species::Proton)
    }

    pub fn with_species(species: Species) -> Self {
        Self {
            species,
            position: Vector::zeros(),
            velocity: Vector::zeros(),
            acceleration: Vector::zeros(),
            integrator: Integrator::default(),
        }
    }

    /// Builder: initial position
    pub fn at(mut self, position: Vector) -> Self {
        self.position = position;
        self
    }

    /// Builder: initial velocity
    pub fn moving(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: integration scheme used by [`Particle::update`]
    pub fn integrated_with(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn is_locked(&self) -> bool {
        self.species.is_locked()
    }

    pub fn mass(&self) -> f64 {
        self.species.mass()
    }

    pub fn charge(&self) -> f64 {
        self.species.charge()
    }

    /// Change the mass. Fixed species keep their mass and report the attempt;
    /// a negative mass is rejected and the old value kept.
    pub fn set_mass(&mut self, mass: f64) -> SimResult<()> {
        match &mut self.species {
            Species::Generic { mass: m, .. } => {
                check_mass(mass)?;
                *m = mass;
                Ok(())
            }
            locked => Err(SimError::LockedSpecies {
                species: locked.name(),
                property: "mass",
            }),
        }
    }

    /// Change the charge. Fixed species keep their charge and report the attempt.
    pub fn set_charge(&mut self, charge: f64) -> SimResult<()> {
        match &mut self.species {
            Species::Generic { charge: q, .. } => {
                *q = charge;
                Ok(())
            }
            locked => Err(SimError::LockedSpecies {
                species: locked.name(),
                property: "charge",
            }),
        }
    }

    pub fn position(&self) -> Vector {
        self.position
    }

    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn acceleration(&self) -> Vector {
        self.acceleration
    }

    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vector) {
        self.acceleration = acceleration;
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    pub fn set_integrator(&mut self, integrator: Integrator) {
        self.integrator = integrator;
    }

    /// Copy kinematic state from `other`. When this particle's species is
    /// not locked it takes over `other`'s mass and charge values but stays
    /// generic, so copying from a proton never locks it.
    pub fn set_all(&mut self, other: &Particle) {
        if !self.is_locked() {
            self.species = Species::generic(other.mass(), other.charge());
        }
        self.position = other.position;
        self.velocity = other.velocity;
        self.acceleration = other.acceleration;
    }

    /// Advance by `dt` under `applied` using the selected integrator.
    /// `applied` is used for this step only; the stored acceleration is left
    /// as it was.
    pub fn update(&mut self, dt: f64, applied: Vector) {
        self.integrator
            .advance(&mut self.position, &mut self.velocity, applied, dt);
    }

    /// Advance by `dt` under the stored acceleration
    pub fn advance(&mut self, dt: f64) {
        let stored = self.acceleration;
        self.update(dt, stored);
    }

    /// One explicit Euler step under `applied`, whatever integrator is selected
    pub fn update_explicit_euler(&mut self, dt: f64, applied: Vector) {
        Integrator::ExplicitEuler.advance(&mut self.position, &mut self.velocity, applied, dt);
    }

    /// One semi-implicit (Euler-Cromer) step under `applied`, whatever
    /// integrator is selected
    pub fn update_semi_implicit_euler(&mut self, dt: f64, applied: Vector) {
        Integrator::SemiImplicitEuler.advance(&mut self.position, &mut self.velocity, applied, dt);
    }

    /// 1/2 m v^2
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass() * self.velocity.dot(&self.velocity)
    }
}

fn check_mass(mass: f64) -> SimResult<()> {
    if mass < 0.0 {
        return Err(SimError::NegativeMass { mass });
    }
    Ok(())
}

/// Order particles by |y| of their position.
/// Ranking criterion for callers; particles carry no intrinsic order.
pub fn by_abs_y(a: &Particle, b: &Particle) -> Ordering {
    a.position.y().abs().total_cmp(&b.position.y().abs())
}
