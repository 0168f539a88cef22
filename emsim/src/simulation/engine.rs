//! High-level runtime engine settings
//!
//! Selects the integration scheme applied to every particle and the sampling
//! distribution used to initialise bunches

use super::bunch::Distribution;
use super::integrator::Integrator;

#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    pub integrator: Integrator, // explicit or semi-implicit Euler
    pub distribution: Distribution, // uniform or gaussian bunch sampling
}
