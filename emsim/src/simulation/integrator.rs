//! Fixed-step first-order integrators for a single particle
//!
//! Both schemes kick the velocity with `v_n+1 = v_n + a dt`; they differ in
//! which velocity drives the position:
//! - explicit Euler:      `x_n+1 = x_n + v_n dt + 1/2 a dt^2`
//! - semi-implicit Euler: `x_n+1 = x_n + v_n+1 dt` (Euler-Cromer, symplectic)
//!
//! The semi-implicit form keeps bounded energy error on periodic motion, the
//! explicit form slowly spirals outward. Orbit runs depend on that difference,
//! so the two are never swapped silently.

use serde::Deserialize;

use super::bunch::Bunch;
use super::forces::FieldSet;
use super::vector::Vector;
use crate::error::SimResult;

/// Which integration scheme a particle advances with
/// `integrator: "explicit_euler"` or `integrator: "semi_implicit_euler"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    #[default]
    #[serde(rename = "explicit_euler")] // position uses the velocity from before the kick
    ExplicitEuler,

    // position uses the kicked velocity
    #[serde(rename = "semi_implicit_euler", alias = "euler_cromer")]
    SemiImplicitEuler,
}

impl Integrator {
    /// Advance `(position, velocity)` by `dt` under a constant `acceleration`
    pub fn advance(
        self,
        position: &mut Vector,
        velocity: &mut Vector,
        acceleration: Vector,
        dt: f64,
    ) {
        match self {
            Integrator::ExplicitEuler => explicit_euler(position, velocity, acceleration, dt),
            Integrator::SemiImplicitEuler => {
                semi_implicit_euler(position, velocity, acceleration, dt)
            }
        }
    }
}

/// x += v dt + 1/2 a dt^2, then v += a dt
pub fn explicit_euler(
    position: &mut Vector,
    velocity: &mut Vector,
    acceleration: Vector,
    dt: f64,
) {
    // Drift with the old velocity, including the constant-acceleration term
    *position += *velocity * dt;
    *position += acceleration * (0.5 * dt * dt);

    // Kick: v_n+1 = v_n + a dt
    *velocity += acceleration * dt;
}

/// v += a dt, then x += v dt
pub fn semi_implicit_euler(
    position: &mut Vector,
    velocity: &mut Vector,
    acceleration: Vector,
    dt: f64,
) {
    // Kick first
    *velocity += acceleration * dt;

    // Drift with the new velocity
    *position += *velocity * dt;
}

/// Advance every particle in the bunch by one step of `dt`, with fields
/// evaluated at time `t`.
/// All accelerations are computed from the state at the start of the step
/// before any particle moves, so a failure leaves the bunch untouched.
pub fn step_bunch(bunch: &mut Bunch, fields: &FieldSet, t: f64, dt: f64) -> SimResult<()> {
    // a_n for each particle from its own position and velocity
    let accels = bunch
        .iter()
        .map(|p| fields.field_at(t, p.position()).acceleration(p))
        .collect::<SimResult<Vec<Vector>>>()?;

    for (p, a) in bunch.iter_mut().zip(accels) {
        p.update(dt, a);
    }
    Ok(())
}
