//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! consumed by the convergence controller:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with seeded bodies at step 0)
//! - the standard five-term force set (`ForceSet`)
//!
//! This is also the validation boundary: malformed records are rejected
//! here with a descriptive [`ConfigError`], so the step loop itself never
//! has to handle bad input.

use crate::configuration::config::{BodyConfig, ConfigError, ScenarioConfig};
use crate::simulation::engine::{AdaptiveStep, Engine, StepParams};
use crate::simulation::forces::ForceSet;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Attractor, Body, NVec3, System};

/// A fully-initialized simulation scenario
///
/// The main "runtime bundle" constructed from a [`ScenarioConfig`]: engine
/// settings, parameters, current system state, and the active force set.
/// Owned by the caller and handed to `relax` for the duration of a run.
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: ForceSet,
}

impl Scenario {
    /// Validate `cfg` and build the runtime scenario from it.
    pub fn build(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        validate(&cfg)?;

        // Parameters (runtime) from ParametersConfig
        let p_cfg = &cfg.parameters;
        let parameters = Parameters {
            k_attractor: p_cfg.k_attractor,
            k_cluster: p_cfg.k_cluster,
            k_repulsion: p_cfg.k_repulsion,
            k_gravity: p_cfg.k_gravity,
            k_buoyancy: p_cfg.k_buoyancy,
            dt: p_cfg.dt,
            damping: p_cfg.damping,
            force_threshold: p_cfg.force_threshold,
            scale_threshold: p_cfg.scale_threshold,
            max_steps: p_cfg.max_steps,
            softening: p_cfg.softening,
            eps: p_cfg.eps,
            baseline: p_cfg.baseline,
            floor_force: p_cfg.floor_force,
        };

        // Bodies: map `BodyConfig` -> runtime `Body` with seeded state
        let bodies: Vec<Body> = cfg.bodies.iter().map(seed_body).collect();
        let system = System { bodies, step: 0 };

        // Engine (runtime) from EngineConfig
        let e_cfg = &cfg.engine;
        let engine = Engine {
            strategy: e_cfg.strategy,
            threads: e_cfg.threads,
            residual: e_cfg.residual,
            adaptive: e_cfg.adaptive.map(|a| AdaptiveStep {
                coarse: StepParams {
                    dt: a.coarse.dt,
                    max_disp: a.coarse.max_disp,
                },
                fine: StepParams {
                    dt: a.fine.dt,
                    max_disp: a.fine.max_disp,
                },
                refine_below: a.refine_below,
            }),
        };

        let forces = ForceSet::standard(&parameters);

        Ok(Self {
            engine,
            parameters,
            system,
            forces,
        })
    }
}

/// Map one body config to its runtime state
///
/// Seeding rule for omitted state: planar position from the first attractor
/// (the origin when the list is empty), height from the `b` scalar, zero
/// velocity.
fn seed_body(bc: &BodyConfig) -> Body {
    let x = match bc.x {
        Some(p) => NVec3::new(p[0], p[1], p[2]),
        None => {
            let (px, pz) = bc
                .attractors
                .first()
                .map(|att| (att.x, att.z))
                .unwrap_or((0.0, 0.0));
            NVec3::new(px, bc.b, pz)
        }
    };
    let v = match bc.v {
        Some(p) => NVec3::new(p[0], p[1], p[2]),
        None => NVec3::zeros(),
    };

    Body {
        x,
        v,
        a: bc.a,
        b: bc.b,
        c: bc.c,
        d: bc.d,
        attractors: bc
            .attractors
            .iter()
            .map(|att| Attractor {
                x: att.x,
                z: att.z,
                w: att.w,
            })
            .collect(),
        name: bc.name.clone(),
    }
}

/// Reject malformed configuration before any state is built.
fn validate(cfg: &ScenarioConfig) -> Result<(), ConfigError> {
    let p = &cfg.parameters;
    if !(p.damping > 0.0 && p.damping < 1.0) {
        return Err(ConfigError::DampingOutOfRange(p.damping));
    }
    if !(p.dt > 0.0 && p.dt.is_finite()) {
        return Err(ConfigError::BadTimeStep(p.dt));
    }
    if !(p.eps > 0.0) {
        return Err(ConfigError::BadEps(p.eps));
    }
    // Infinity is a legal threshold (forces immediate convergence); zero and
    // below can never satisfy the strict residual comparison, so they are
    // rejected along with NaN
    if !(p.force_threshold > 0.0) {
        return Err(ConfigError::BadThreshold(p.force_threshold));
    }
    if cfg.engine.threads == Some(0) {
        return Err(ConfigError::ZeroThreads);
    }
    if let Some(a) = &cfg.engine.adaptive {
        for (field, value) in [
            ("coarse.dt", a.coarse.dt),
            ("coarse.max_disp", a.coarse.max_disp),
            ("fine.dt", a.fine.dt),
            ("fine.max_disp", a.fine.max_disp),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::BadAdaptiveStep { field, value });
            }
        }
    }

    for (index, bc) in cfg.bodies.iter().enumerate() {
        for (field, value) in [("a", bc.a), ("b", bc.b), ("c", bc.c), ("d", bc.d)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteField { index, field });
            }
        }
        if bc.d < 0.0 {
            return Err(ConfigError::NegativeDiameter { index, d: bc.d });
        }
        for (attractor, att) in bc.attractors.iter().enumerate() {
            if !(att.x.is_finite() && att.z.is_finite() && att.w.is_finite()) {
                return Err(ConfigError::NonFiniteAttractor { index, attractor });
            }
            if att.w < 0.0 {
                return Err(ConfigError::NegativeWeight {
                    index,
                    attractor,
                    w: att.w,
                });
            }
        }
    }
    Ok(())
}
