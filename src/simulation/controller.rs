//! Convergence controller: the step loop and its termination policy
//!
//! Drives force evaluation and integration until the residual drops below
//! the configured threshold (`Converged`), the step cap is hit
//! (`Exhausted`), or an external cancellation arrives (`Interrupted`).
//! Tracks the lowest-residual snapshot seen so far and always reports that
//! snapshot, guarding against divergence or oscillation near the end of a
//! run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::configuration::config::{ResidualConfig, StrategyConfig};
use crate::simulation::engine::StepParams;
use crate::simulation::integrator::damped_euler;
use crate::simulation::parallel::{bounded_threads, WorkerPool, MAX_WORKERS};
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{NVec3, System};

/// Log a residual line every this many steps (debug level).
const REPORT_EVERY: u64 = 100;

/// Cooperative cancellation flag, checked between steps
///
/// Clones share one flag; cancelling any clone interrupts the run after the
/// in-flight step finishes, so the reported state is never half-updated.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Terminal state of a relaxation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Converged,
    Exhausted,
    Interrupted,
}

/// Outcome of [`relax`]: the best-known positions plus convergence metrics.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub steps: u64, // force evaluations performed
    pub residual: f64, // residual of the reported (best) snapshot
    pub positions: Vec<NVec3>, // best snapshot, ordered like `System::bodies`
}

/// One output record per body: final position, carried-through scalars, and
/// the run's convergence metrics. Cosmetic animation metadata is left to
/// downstream consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub status: RunStatus,
    pub residual: f64,
    pub steps: u64,
}

impl RunReport {
    /// Merge the best snapshot with the per-body scalars of `sys` into
    /// ordered output records.
    pub fn records(&self, sys: &System) -> Vec<ResultRecord> {
        self.positions
            .iter()
            .zip(sys.bodies.iter())
            .map(|(p, body)| ResultRecord {
                name: body.name.clone(),
                x: p.x,
                y: p.y,
                z: p.z,
                a: body.a,
                b: body.b,
                c: body.c,
                d: body.d,
                status: self.status,
                residual: self.residual,
                steps: self.steps,
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum RelaxError {
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Aggregate per-body force magnitudes into the convergence residual.
fn aggregate_residual(forces: &[NVec3], policy: ResidualConfig) -> f64 {
    match policy {
        ResidualConfig::Max => forces.iter().map(|f| f.norm()).fold(0.0, f64::max),
        ResidualConfig::Sum => forces.iter().map(|f| f.norm()).sum(),
    }
}

/// Relax the scenario's system until it converges, exhausts the step cap,
/// or is cancelled
///
/// Each step: evaluate forces via the configured strategy, update the best
/// snapshot, test the stopping predicate, integrate, then observe the
/// cancellation token. With `max_steps == 0` the loop body never runs and
/// the report carries the initial positions with an infinite residual.
pub fn relax(scenario: &mut Scenario, cancel: &CancelToken) -> Result<RunReport, RelaxError> {
    let n = scenario.system.bodies.len();

    // One pool for the whole run; `None` means sequential evaluation
    let pool = match scenario.engine.strategy {
        StrategyConfig::Sequential => None,
        StrategyConfig::Parallel => {
            // An explicit override still respects the global worker cap
            let threads = scenario
                .engine
                .threads
                .map(|t| t.min(MAX_WORKERS))
                .unwrap_or_else(|| bounded_threads(n));
            Some(WorkerPool::new(threads)?)
        }
    };
    if let Some(pool) = &pool {
        log::debug!("parallel force evaluation on {} workers", pool.threads());
    }

    let threshold = if scenario.parameters.scale_threshold {
        scenario.parameters.force_threshold * n as f64
    } else {
        scenario.parameters.force_threshold
    };
    let base = StepParams {
        dt: scenario.parameters.dt,
        max_disp: f64::INFINITY,
    };

    let mut forces = vec![NVec3::zeros(); n];
    let mut best_positions: Vec<NVec3> = scenario.system.bodies.iter().map(|b| b.x).collect();
    let mut best_residual = f64::INFINITY;
    let mut status = RunStatus::Exhausted;
    let mut steps = 0;

    for step in 1..=scenario.parameters.max_steps {
        match &pool {
            Some(pool) => pool.accumulate_forces(&scenario.forces, &scenario.system, &mut forces),
            None => scenario.forces.accumulate_forces(&scenario.system, &mut forces),
        }
        let residual = aggregate_residual(&forces, scenario.engine.residual);
        steps = step;

        // Snapshot the pre-integration positions the residual was measured at
        if residual < best_residual {
            best_residual = residual;
            for (slot, body) in best_positions.iter_mut().zip(&scenario.system.bodies) {
                *slot = body.x;
            }
        }

        if residual < threshold {
            status = RunStatus::Converged;
            break;
        }

        let step_params = scenario.engine.step_params(residual, base);
        damped_euler(&mut scenario.system, &forces, &scenario.parameters, &step_params);

        if step % REPORT_EVERY == 0 {
            log::debug!("step {step:6} | residual {residual:.6}");
        }
        if cancel.is_cancelled() {
            status = RunStatus::Interrupted;
            break;
        }
    }

    Ok(RunReport {
        status,
        steps,
        residual: best_residual,
        positions: best_positions,
    })
}
