//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime [`Scenario`]
//! containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - the superposed field sources (`FieldSet`)
//! - the particles (`Bunch`, a single particle is a bunch of one)
//! - the orbit tracker and the optional trajectory sink
//!
//! Each step advances every particle, then writes the trajectory row, then
//! asks the tracker about the centroid. The tracker therefore only ever sees
//! a fully advanced bunch.

use log::{debug, info, warn};

use crate::configuration::config::{BunchConfig, FieldConfig, ParticleConfig, ScenarioConfig};
use crate::error::{SimError, SimResult};
use crate::output::trajectory::TrajectoryWriter;
use crate::simulation::bunch::Bunch;
use crate::simulation::engine::Engine;
use crate::simulation::forces::{
    cyclotron_frequency, cyclotron_radius, CyclotronField, FieldSet, OscillatingElectricField,
    UniformField,
};
use crate::simulation::integrator::step_bunch;
use crate::simulation::orbit::OrbitTracker;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Particle, Species, SpeciesKind};
use crate::simulation::vector::Vector;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxRevolutions,
    MaxTime,
    SpreadsMatched, // x and y max spreads agreed within tolerance
}

/// Uniform-B reference used to compare the simulated orbit with theory
#[derive(Debug, Clone, Copy)]
pub struct CyclotronReference {
    pub b: f64, // T
    pub charge: f64,
    pub mass: f64,
}

impl CyclotronReference {
    /// 1 / (qB / 2 pi m)
    pub fn period(&self) -> f64 {
        1.0 / cyclotron_frequency(self.charge, self.mass, self.b)
    }

    pub fn radius(&self, speed: f64) -> f64 {
        cyclotron_radius(self.mass, speed, self.charge, self.b)
    }
}

/// Outcome of [`Scenario::run`]
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: u64,
    pub time: f64, // s
    pub revolutions: u32,
    pub periods: Vec<f64>, // duration of each detected revolution (s)
    pub stop_reason: StopReason,
    pub final_position: Vector, // centroid (m)
    pub final_velocity: Vector, // mean velocity (m/s)
    pub initial_speed: f64, // mean speed at t = 0 (m/s)
    pub reference: Option<CyclotronReference>,
}

impl RunSummary {
    /// Total time over revolutions, None before the first orbit
    pub fn simulated_period(&self) -> Option<f64> {
        (self.revolutions > 0).then(|| self.time / f64::from(self.revolutions))
    }

    /// (expected - simulated) / expected
    pub fn period_fractional_difference(&self) -> Option<f64> {
        let expected = self.reference?.period();
        let simulated = self.simulated_period()?;
        Some((expected - simulated) / expected)
    }
}

/// Runtime bundle built from a [`ScenarioConfig`]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub fields: FieldSet,
    pub bunch: Bunch,
    pub tracker: OrbitTracker,
    pub trajectory: Option<TrajectoryWriter>,
    pub reference: Option<CyclotronReference>,
    time: f64,
    steps: u64,
    revolutions: u32,
    last_revolution_time: f64,
    periods: Vec<f64>,
    initial_speed: f64,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        // Engine (runtime) from EngineConfig
        let engine = Engine {
            integrator: cfg.engine.integrator,
            distribution: cfg.engine.distribution,
        };

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        if !(p_cfg.time_step > 0.0) {
            return Err(SimError::config(format!(
                "time_step must be positive, got {}",
                p_cfg.time_step
            )));
        }
        let parameters = Parameters {
            time_step: p_cfg.time_step,
            max_time: p_cfg.max_time,
            max_revolutions: p_cfg.max_revolutions,
            sample_every: p_cfg.sample_every.max(1),
            seed: p_cfg.seed,
            spread_tolerance: p_cfg.spread_tolerance,
            orbit_origin: Vector::from_slice(&p_cfg.orbit_origin)?,
        };

        // Fields: superpose every configured source
        let mut fields = FieldSet::new();
        let mut reference_b = None;
        for f_cfg in &cfg.field {
            fields = match f_cfg {
                FieldConfig::Uniform { electric, magnetic } => {
                    let magnetic = Vector::from_slice(magnetic)?;
                    reference_b.get_or_insert(magnetic.magnitude());
                    fields.with(UniformField {
                        electric: Vector::from_slice(electric)?,
                        magnetic,
                    })
                }
                FieldConfig::Cyclotron { b_positive_x, b_negative_x } => {
                    reference_b.get_or_insert(*b_positive_x);
                    fields.with(CyclotronField {
                        b_positive_x: *b_positive_x,
                        b_negative_x: *b_negative_x,
                    })
                }
                FieldConfig::OscillatingElectric {
                    amplitude,
                    angular_frequency,
                    direction,
                } => fields.with(OscillatingElectricField {
                    amplitude: *amplitude,
                    angular_frequency: *angular_frequency,
                    direction: Vector::from_slice(direction)?,
                }),
            };
        }

        // Particles: the sampled bunch first, then explicitly placed ones
        let mut bunch = Bunch::new(parameters.seed);
        bunch.set_distribution(engine.distribution);
        if let Some(bc) = &cfg.bunch {
            fill_sampled_bunch(&mut bunch, bc, engine)?;
        }
        for pc in &cfg.particles {
            bunch.add_particle(build_particle(pc)?.integrated_with(engine.integrator));
        }
        if bunch.is_empty() {
            return Err(SimError::config("scenario defines no particles"));
        }

        let first = bunch.iter().next().map(Particle::species);
        let reference = match (reference_b, first) {
            (Some(b), Some(species)) if b != 0.0 => Some(CyclotronReference {
                b,
                charge: species.charge(),
                mass: species.mass(),
            }),
            _ => None,
        };

        let trajectory = match &cfg.output.trajectory {
            Some(path) => Some(TrajectoryWriter::append(path, cfg.output.format)?),
            None => None,
        };

        let tracker = OrbitTracker::new(parameters.orbit_origin);
        let initial_speed = bunch.mean_velocity()?.magnitude();

        info!(
            "scenario: {} particles, {} field terms, {:?}, dt = {:e} s",
            bunch.len(),
            fields.len(),
            engine.integrator,
            parameters.time_step
        );

        Ok(Self {
            engine,
            parameters,
            fields,
            bunch,
            tracker,
            trajectory,
            reference,
            time: 0.0,
            steps: 0,
            revolutions: 0,
            last_revolution_time: 0.0,
            periods: Vec::new(),
            initial_speed,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn revolutions(&self) -> u32 {
        self.revolutions
    }

    /// Advance one time step. Returns the period of the revolution completed
    /// by this step, if any. If the particles cannot be advanced the clock
    /// and step count stay where they were.
    pub fn step(&mut self) -> SimResult<Option<f64>> {
        let dt = self.parameters.time_step;
        let t = self.time + dt;

        // Move all particles; fields are evaluated at the new time
        step_bunch(&mut self.bunch, &self.fields, t, dt)?;
        self.time = t;
        self.steps += 1;

        if (self.steps - 1) % self.parameters.sample_every == 0 {
            if let Some(writer) = self.trajectory.as_mut() {
                writer.record(self.time, self.bunch.mean_position()?)?;
            }
        }

        if !self.tracker.has_bunch_orbited(&self.bunch)? {
            return Ok(None);
        }

        self.revolutions += 1;
        let period = self.time - self.last_revolution_time;
        self.last_revolution_time = self.time;
        self.periods.push(period);

        info!("Revolution number {:3} at time {:10.6} s", self.revolutions, self.time);
        info!("Period of this revolution is  {:10.6} s", period);
        debug!("\n{}", self.bunch.report()?);

        Ok(Some(period))
    }

    /// Step until a revolution/time limit is hit or the bunch spreads match
    pub fn run(&mut self) -> SimResult<RunSummary> {
        let stop_reason = loop {
            if self.revolutions >= self.parameters.max_revolutions {
                break StopReason::MaxRevolutions;
            }
            if self.time >= self.parameters.max_time {
                break StopReason::MaxTime;
            }

            if self.step()?.is_some() {
                if let Some(tol) = self.parameters.spread_tolerance {
                    let spread = self.bunch.spread_max()?;
                    if spreads_match(spread.x(), spread.y(), tol) {
                        info!(
                            "x and y spreads agree within {tol} after {} revolutions",
                            self.revolutions
                        );
                        break StopReason::SpreadsMatched;
                    }
                }
            }
        };

        if let Some(writer) = self.trajectory.as_mut() {
            writer.flush()?;
        }

        let summary = RunSummary {
            steps: self.steps,
            time: self.time,
            revolutions: self.revolutions,
            periods: self.periods.clone(),
            stop_reason,
            final_position: self.bunch.mean_position()?,
            final_velocity: self.bunch.mean_velocity()?,
            initial_speed: self.initial_speed,
            reference: self.reference,
        };
        if summary.revolutions == 0 {
            warn!("no orbit completed in {:.6} s of simulated time", summary.time);
        }
        Ok(summary)
    }
}

/// True when x and y spreads differ by at most `tolerance` relative to each
pub fn spreads_match(spread_x: f64, spread_y: f64, tolerance: f64) -> bool {
    let diff = (spread_x - spread_y).abs();
    diff <= tolerance * spread_x && diff <= tolerance * spread_y
}

fn resolve_species(
    kind: SpeciesKind,
    mass: Option<f64>,
    charge: Option<f64>,
) -> SimResult<Species> {
    match kind {
        SpeciesKind::Proton => {
            if mass.is_some() || charge.is_some() {
                warn!("proton mass and charge are fixed; configured values ignored");
            }
            Ok(Species::Proton)
        }
        SpeciesKind::Generic => {
            let mass = mass.ok_or_else(|| SimError::config("generic particles need a mass"))?;
            Species::checked_generic(mass, charge.unwrap_or(0.0))
        }
    }
}

fn build_particle(pc: &ParticleConfig) -> SimResult<Particle> {
    let species = resolve_species(pc.species, pc.mass, pc.charge)?;
    Ok(Particle::with_species(species)
        .at(Vector::from_slice(&pc.position)?)
        .moving(Vector::from_slice(&pc.velocity)?))
}

/// Add `count` identical particles to an empty bunch and scatter them
fn fill_sampled_bunch(bunch: &mut Bunch, bc: &BunchConfig, engine: Engine) -> SimResult<()> {
    let species = resolve_species(bc.species, bc.mass, bc.charge)?;
    let template = Particle::with_species(species).integrated_with(engine.integrator);
    for _ in 0..bc.count {
        bunch.add_particle(template.clone());
    }

    let mean_energy = 0.5 * species.mass() * bc.speed * bc.speed;
    bunch.set_position(
        Vector::from_slice(&bc.position)?,
        Vector::from_slice(&bc.position_spread)?,
    )?;
    bunch.set_velocity(
        Vector::from_slice(&bc.direction)?,
        Vector::from_slice(&bc.direction_spread)?,
        mean_energy,
        bc.energy_spread * mean_energy,
    )
}
