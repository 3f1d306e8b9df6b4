//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! layout scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – execution strategy, residual policy, adaptive stepping
//! - [`ParametersConfig`] – force constants and numerical parameters
//! - [`BodyConfig`]       – per-body scalars, attractors, optional seed state
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   strategy: "parallel"    # or "sequential"
//!   threads: 8              # optional worker override
//!   residual: "max"         # or "sum"
//!   adaptive:               # optional coarse/fine stepping
//!     coarse: { dt: 0.04, max_disp: 1.0 }
//!     fine:   { dt: 0.01, max_disp: 0.1 }
//!     refine_below: 1.0
//!
//! parameters:
//!   k_attractor: 0.16
//!   k_cluster: 0.02
//!   k_repulsion: 0.2
//!   k_gravity: 0.2
//!   k_buoyancy: 1.0
//!   dt: 0.04
//!   damping: 0.90
//!   force_threshold: 0.1
//!   max_steps: 100000
//!
//! bodies:
//!   - a: 0.05
//!     b: 3.0
//!     c: 1
//!     d: 5.0
//!     attractors:
//!       - { x: 3.0, z: 2.0, w: 1.0 }
//!       - { x: 1.0, z: 3.0, w: 2.0 }
//! ```
//!
//! Both the engine and parameters sections may be omitted entirely; every
//! field falls back to the reference defaults. Validation happens when the
//! configuration is turned into a runtime `Scenario`, not during parsing.

use serde::Deserialize;
use thiserror::Error;

/// Which execution strategy evaluates the force model
/// `strategy: "sequential"` or `strategy: "parallel"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyConfig {
    #[serde(rename = "sequential")] // single-threaded whole-array pass
    Sequential,

    #[serde(rename = "parallel")] // per-body tasks on a bounded worker pool
    Parallel,
}

/// How per-body force magnitudes aggregate into the convergence residual
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidualConfig {
    #[serde(rename = "max")] // largest per-body force magnitude
    Max,

    #[serde(rename = "sum")] // total of per-body force magnitudes; grows with N
    Sum,
}

/// One `(dt, max_disp)` pair for adaptive stepping.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct StepConfig {
    pub dt: f64,       // integration step size while this pair is active
    pub max_disp: f64, // per-step displacement cap
}

/// Coarse/fine step-sizing configuration.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct AdaptiveConfig {
    pub coarse: StepConfig,
    pub fine: StepConfig,
    pub refine_below: f64, // switch to `fine` once the residual drops below this
}

/// High-level engine configuration
/// Controls how the simulation runs, not what it computes
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: StrategyConfig, // sequential or parallel force evaluation
    pub threads: Option<usize>,   // worker count; bounded automatically when absent
    pub residual: ResidualConfig, // residual aggregation policy
    pub adaptive: Option<AdaptiveConfig>, // coarse/fine stepping, off by default
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::Sequential,
            threads: None,
            residual: ResidualConfig::Max,
            adaptive: None,
        }
    }
}

/// Global force constants and numerical parameters for a scenario
///
/// Defaults are the reference values of the layout model; any subset may be
/// overridden in YAML.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub k_attractor: f64,     // attractor pull scale
    pub k_cluster: f64,       // intra-cluster attraction scale
    pub k_repulsion: f64,     // pairwise repulsion scale
    pub k_gravity: f64,       // vertical restoring force scale
    pub k_buoyancy: f64,      // vertical lift scale
    pub dt: f64,              // integration time step
    pub damping: f64,         // velocity damping, strictly inside (0, 1)
    pub force_threshold: f64, // stop when the residual drops below this
    pub scale_threshold: bool, // multiply the threshold by the body count
    pub max_steps: u64,       // hard cap to avoid runaway sims
    pub softening: f64,       // contact-distance factor in the repulsion denominator
    pub eps: f64,             // numerical safety floor for repulsion denominators
    pub baseline: f64,        // offset added to `a`/`b` in the vertical terms
    pub floor_force: f64,     // constant upward force below the ground plane
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            k_attractor: 0.16,
            k_cluster: 0.02,
            k_repulsion: 0.2,
            k_gravity: 0.2,
            k_buoyancy: 1.0,
            dt: 0.04,
            damping: 0.90,
            force_threshold: 0.1,
            scale_threshold: false,
            max_steps: 100_000,
            softening: 0.7,
            eps: 1e-6,
            baseline: 10.0,
            floor_force: 10_000.0,
        }
    }
}

/// One weighted ground-plane target of a body.
#[derive(Deserialize, Debug, Clone)]
pub struct AttractorConfig {
    pub x: f64, // ground-plane x
    pub z: f64, // ground-plane z
    pub w: f64, // pull strength, must be non-negative
}

/// Configuration for a single body
///
/// Position and velocity are optional: when omitted, the body is seeded on
/// its first attractor (the origin if it has none) at height `b`, with zero
/// velocity.
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub a: f64, // gravity modifier
    pub b: f64, // buoyancy modifier / initial height seed
    pub c: f64, // cluster id
    pub d: f64, // diameter, must be non-negative
    #[serde(default)]
    pub attractors: Vec<AttractorConfig>,
    #[serde(default)]
    pub name: Option<String>, // external identifier for output correlation
    #[serde(default)]
    pub x: Option<[f64; 3]>, // explicit initial position override
    #[serde(default)]
    pub v: Option<[f64; 3]>, // explicit initial velocity override
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig, // how to run (strategy, residual, stepping)
    #[serde(default)]
    pub parameters: ParametersConfig, // force constants and numerics
    pub bodies: Vec<BodyConfig>, // the initial population
}

/// Rejection reasons raised when a [`ScenarioConfig`] is turned into a
/// runtime scenario. Everything here is caught before the step loop starts;
/// once inputs validate, nothing inside the loop can fail.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("body {index}: field `{field}` is not finite")]
    NonFiniteField { index: usize, field: &'static str },

    #[error("body {index}: diameter must be non-negative, got {d}")]
    NegativeDiameter { index: usize, d: f64 },

    #[error("body {index}: attractor {attractor}: coordinates must be finite")]
    NonFiniteAttractor { index: usize, attractor: usize },

    #[error("body {index}: attractor {attractor}: weight must be non-negative, got {w}")]
    NegativeWeight {
        index: usize,
        attractor: usize,
        w: f64,
    },

    #[error("`damping` must lie strictly between 0 and 1, got {0}")]
    DampingOutOfRange(f64),

    #[error("`dt` must be positive and finite, got {0}")]
    BadTimeStep(f64),

    #[error("`eps` must be positive, got {0}")]
    BadEps(f64),

    #[error("`force_threshold` must be positive, got {0}")]
    BadThreshold(f64),

    #[error("`threads` must be at least 1 when set")]
    ZeroThreads,

    #[error("adaptive step: `{field}` must be positive, got {value}")]
    BadAdaptiveStep { field: &'static str, value: f64 },
}
