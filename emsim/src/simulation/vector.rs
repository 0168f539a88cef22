//! Three-component cartesian vector used for positions, velocities,
//! accelerations and field values.
//!
//! `Vector` is a `Copy` wrapper around `nalgebra::Vector3<f64>`, so every
//! assignment or accessor hands out an independent value and internal state
//! can never be aliased. Binary operations return new vectors; the
//! `*_by` / `*_in_place` methods mutate only the receiver.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use nalgebra::Vector3;

use crate::error::{SimError, SimResult};

pub type NVec3 = Vector3<f64>;

/// Component-wise tolerance used by [`Vector::approx_eq`] and `==`.
/// Kept at 1e-34 for compatibility even though it is tighter than most
/// round-off seen in practice.
pub const EQUALITY_EPSILON: f64 = 1.0e-34;

/// Magnitudes at or below this are treated as the zero vector when
/// normalising.
pub const UNIT_EPSILON: f64 = 1.0e-34;

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector(NVec3);

impl Vector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(NVec3::new(x, y, z))
    }

    /// Vector in the xy-plane (z = 0)
    pub fn planar(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    pub fn zeros() -> Self {
        Self(NVec3::zeros())
    }

    /// Build a vector from raw components.
    ///
    /// Three values fill x, y, z; two values fill x, y and leave z at zero.
    /// Anything else is rejected.
    pub fn from_slice(components: &[f64]) -> SimResult<Self> {
        match *components {
            [x, y, z] => Ok(Self::new(x, y, z)),
            [x, y] => Ok(Self::planar(x, y)),
            _ => Err(SimError::InvalidVectorLength {
                len: components.len(),
            }),
        }
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn set_x(&mut self, x: f64) {
        self.0.x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.0.y = y;
    }

    pub fn set_z(&mut self, z: f64) {
        self.0.z = z;
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.0.x, self.0.y, self.0.z]
    }

    /// Underlying nalgebra value
    pub fn as_nalgebra(&self) -> NVec3 {
        self.0
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &Vector) -> Vector {
        Self(self.0 + other.0)
    }

    /// `self - other`
    pub fn subtract(&self, other: &Vector) -> Vector {
        Self(self.0 - other.0)
    }

    pub fn scale(&self, factor: f64) -> Vector {
        Self(self.0 * factor)
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.0.dot(&other.0)
    }

    pub fn cross(&self, other: &Vector) -> Vector {
        Self(self.0.cross(&other.0))
    }

    /// Component-by-component product (x*x', y*y', z*z')
    pub fn multiply(&self, other: &Vector) -> Vector {
        Self(self.0.component_mul(&other.0))
    }

    /// Apply `f` to each component
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Vector {
        Self(self.0.map(f))
    }

    /// sqrt(v . v)
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Same direction, length one. A (near) zero vector has no direction, so
    /// the zero vector comes back instead of dividing by ~0.
    pub fn unit_vector(&self) -> Vector {
        let magnitude = self.magnitude();
        if magnitude.abs() > UNIT_EPSILON {
            self.scale(1.0 / magnitude)
        } else {
            Self::zeros()
        }
    }

    /// True when every component differs by less than [`EQUALITY_EPSILON`]
    pub fn approx_eq(&self, other: &Vector) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() < EQUALITY_EPSILON)
    }

    pub fn increase_by(&mut self, other: &Vector) {
        self.0 += other.0;
    }

    pub fn decrease_by(&mut self, other: &Vector) {
        self.0 -= other.0;
    }

    pub fn scale_in_place(&mut self, factor: f64) {
        self.0 *= factor;
    }

    /// Components as `%10.6f` columns, as used in bunch reports
    pub fn fixed_width(&self) -> String {
        format!("{:10.6} {:10.6} {:10.6}", self.0.x, self.0.y, self.0.z)
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

/// Space separated `x y z`, the trajectory row format
impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.0.x, self.0.y, self.0.z)
    }
}

impl From<NVec3> for Vector {
    fn from(v: NVec3) -> Self {
        Self(v)
    }
}

impl From<[f64; 3]> for Vector {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl TryFrom<&[f64]> for Vector {
    type Error = SimError;

    fn try_from(components: &[f64]) -> SimResult<Self> {
        Self::from_slice(components)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Self(-self.0)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Self(self.0 * rhs)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;
    fn mul(self, rhs: Vector) -> Vector {
        Vector(rhs.0 * self)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        self.0 -= rhs.0;
    }
}

impl MulAssign<f64> for Vector {
    fn mul_assign(&mut self, rhs: f64) {
        self.0 *= rhs;
    }
}

impl Sum for Vector {
    fn sum<I: Iterator<Item = Vector>>(iter: I) -> Vector {
        iter.fold(Vector::zeros(), |acc, v| acc + v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_basis_vectors() {
        let x = Vector::new(1.0, 0.0, 0.0);
        let y = Vector::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vector::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn in_place_ops_touch_only_receiver() {
        let mut a = Vector::new(1.0, 2.0, 3.0);
        let b = Vector::new(0.5, 0.5, 0.5);
        a.increase_by(&b);
        assert_eq!(a, Vector::new(1.5, 2.5, 3.5));
        a.decrease_by(&b);
        a.scale_in_place(2.0);
        assert_eq!(a, Vector::new(2.0, 4.0, 6.0));
        assert_eq!(b, Vector::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn display_is_space_separated() {
        assert_eq!(Vector::new(1.5, -2.0, 0.25).to_string(), "1.5 -2 0.25");
    }

    #[test]
    fn from_slice_two_components_sets_z_zero() {
        let v = Vector::from_slice(&[3.0, 4.0]).unwrap();
        assert_eq!(v, Vector::new(3.0, 4.0, 0.0));
    }
}
