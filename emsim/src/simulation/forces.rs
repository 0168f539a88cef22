//! Electromagnetic fields and the Lorentz force law
//!
//! [`Field`] holds an electric field E and magnetic flux density B and turns
//! them into the acceleration of a charged particle. Space/time dependent
//! setups are expressed as [`FieldSource`] terms superposed by a [`FieldSet`].
//! SI units throughout.

use std::f64::consts::PI;

use super::states::Particle;
use super::vector::Vector;
use crate::error::{SimError, SimResult};

/// Electric field strength + magnetic flux density at one place and time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Field {
    electric: Vector, // V/m
    magnetic: Vector, // T
}

impl Field {
    pub fn new(electric: Vector, magnetic: Vector) -> Self {
        Self { electric, magnetic }
    }

    pub fn electric(&self) -> Vector {
        self.electric
    }

    pub fn magnetic(&self) -> Vector {
        self.magnetic
    }

    pub fn set_electric(&mut self, electric: Vector) {
        self.electric = electric;
    }

    pub fn set_magnetic(&mut self, magnetic: Vector) {
        self.magnetic = magnetic;
    }

    /// Non-relativistic Lorentz acceleration a = (q/m)(E + v x B), using the
    /// particle's current velocity. Massless particles are rejected.
    pub fn acceleration(&self, particle: &Particle) -> SimResult<Vector> {
        let mass = particle.mass();
        if mass == 0.0 {
            return Err(SimError::ZeroMass);
        }

        let lorentz = self.electric + particle.velocity().cross(&self.magnetic);
        Ok(lorentz * (particle.charge() / mass))
    }
}

impl std::ops::Add for Field {
    type Output = Field;
    fn add(self, rhs: Field) -> Field {
        Field::new(self.electric + rhs.electric, self.magnetic + rhs.magnetic)
    }
}

/// A contribution to the total field at time `t` and `position`
pub trait FieldSource {
    fn field_at(&self, t: f64, position: Vector) -> Field;
}

/// Superposition of field sources. E and B of all terms are summed.
#[derive(Default)]
pub struct FieldSet {
    terms: Vec<Box<dyn FieldSource + Send + Sync>>,
}

impl FieldSet {
    /// Create an empty field set (zero field everywhere)
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a source term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: FieldSource + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Total field at time `t` and `position`
    pub fn field_at(&self, t: f64, position: Vector) -> Field {
        self.terms
            .iter()
            .fold(Field::default(), |total, term| total + term.field_at(t, position))
    }
}

/// Same E and B everywhere, at all times
#[derive(Debug, Clone, Copy)]
pub struct UniformField {
    pub electric: Vector,
    pub magnetic: Vector,
}

impl FieldSource for UniformField {
    fn field_at(&self, _t: f64, _position: Vector) -> Field {
        Field::new(self.electric, self.magnetic)
    }
}

/// Cyclotron magnet with a field error: B points along +z with magnitude
/// `b_positive_x` where x > 0 and `b_negative_x` where x <= 0
#[derive(Debug, Clone, Copy)]
pub struct CyclotronField {
    pub b_positive_x: f64, // T
    pub b_negative_x: f64, // T
}

impl FieldSource for CyclotronField {
    fn field_at(&self, _t: f64, position: Vector) -> Field {
        let b = if position.x() > 0.0 {
            self.b_positive_x
        } else {
            self.b_negative_x
        };
        Field::new(Vector::zeros(), Vector::new(0.0, 0.0, b))
    }
}

/// Spatially uniform electric field oscillating as
/// `amplitude * sin(angular_frequency * t)` along `direction`
#[derive(Debug, Clone, Copy)]
pub struct OscillatingElectricField {
    pub amplitude: f64,         // V/m
    pub angular_frequency: f64, // rad/s
    pub direction: Vector,
}

impl FieldSource for OscillatingElectricField {
    fn field_at(&self, t: f64, _position: Vector) -> Field {
        let e = self.amplitude * (self.angular_frequency * t).sin();
        Field::new(self.direction.unit_vector() * e, Vector::zeros())
    }
}

/// Expected orbital frequency qB / (2 pi m) of a charge in a uniform B field (Hz)
pub fn cyclotron_frequency(charge: f64, mass: f64, b: f64) -> f64 {
    charge * b / (2.0 * PI * mass)
}

/// Expected orbit radius m v / (q B) of a charge in a uniform B field (m)
pub fn cyclotron_radius(mass: f64, speed: f64, charge: f64, b: f64) -> f64 {
    mass * speed / (charge * b)
}
