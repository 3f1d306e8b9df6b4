pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Attractor, Body, System, NVec3};
pub use simulation::params::Parameters;
pub use simulation::engine::{AdaptiveStep, Engine, StepParams};
pub use simulation::forces::{
    AttractorPull, Buoyancy, ClusterAttraction, Force, ForceSet, Gravity, PairRepulsion,
};
pub use simulation::integrator::damped_euler;
pub use simulation::parallel::{bounded_threads, WorkerPool, MAX_WORKERS};
pub use simulation::controller::{relax, CancelToken, RelaxError, ResultRecord, RunReport, RunStatus};
pub use simulation::scenario::Scenario;

pub use configuration::config::{
    AdaptiveConfig, AttractorConfig, BodyConfig, ConfigError, EngineConfig, ParametersConfig,
    ResidualConfig, ScenarioConfig, StepConfig, StrategyConfig,
};

pub use benchmark::benchmark::{bench_forces, bench_relax};
