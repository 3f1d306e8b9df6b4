//! Task-parallel force evaluation over a long-lived worker pool
//!
//! The pool is built once per run and reused for every step, instead of
//! spawning workers per contribution. Each per-body task reads the shared
//! body state immutably and writes exactly one slot of the output buffer,
//! so no synchronization is needed beyond the fork/join itself. Steps stay
//! strictly sequential; parallelism exists only inside a single force pass.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::simulation::forces::ForceSet;
use crate::simulation::states::{NVec3, System};

/// Upper bound on worker threads regardless of the host CPU count.
pub const MAX_WORKERS: usize = 32;

/// Default worker count: host parallelism, capped by [`MAX_WORKERS`] and by
/// the body count (extra workers would only idle).
pub fn bounded_threads(n_bodies: usize) -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cpus.min(MAX_WORKERS).min(n_bodies.max(1))
}

/// Dedicated thread pool evaluating a [`ForceSet`] body-by-body.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Fill `out` with total per-body forces, one task per body
    ///
    /// Equivalent to `ForceSet::accumulate_forces` up to floating-point
    /// association: pairwise terms are recomputed from each side instead of
    /// being applied equal-and-opposite, which keeps every output slot
    /// owned by a single task.
    pub fn accumulate_forces(&self, forces: &ForceSet, sys: &System, out: &mut [NVec3]) {
        self.pool.install(|| {
            out.par_iter_mut()
                .enumerate()
                .for_each(|(i, slot)| *slot = forces.force_on(i, sys));
        });
    }
}
