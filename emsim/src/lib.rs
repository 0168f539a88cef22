pub mod simulation;
pub mod configuration;
pub mod output;
pub mod error;

pub use simulation::vector::{Vector, NVec3};
pub use simulation::states::{Particle, Species, SpeciesKind, by_abs_y};
pub use simulation::states::{PROTON_CHARGE, PROTON_MASS};
pub use simulation::forces::{Field, FieldSource, FieldSet};
pub use simulation::forces::{UniformField, CyclotronField, OscillatingElectricField};
pub use simulation::forces::{cyclotron_frequency, cyclotron_radius};
pub use simulation::integrator::{Integrator, step_bunch};
pub use simulation::bunch::{Bunch, BunchReport, Distribution};
pub use simulation::orbit::{OrbitTracker, RadialState};
pub use simulation::scenario::{Scenario, RunSummary, StopReason, CyclotronReference, spreads_match};

pub use configuration::config::{EngineConfig, ParametersConfig, FieldConfig};
pub use configuration::config::{BunchConfig, ParticleConfig, OutputConfig, ScenarioConfig};

pub use output::trajectory::{TrajectoryWriter, RowFormat};

pub use error::{SimError, SimResult};
