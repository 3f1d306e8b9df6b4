use std::time::Instant;

use crate::simulation::controller::{relax, CancelToken};
use crate::simulation::engine::Engine;
use crate::simulation::forces::ForceSet;
use crate::simulation::parallel::{bounded_threads, WorkerPool};
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Attractor, Body, NVec3, System};
use crate::configuration::config::{ResidualConfig, StrategyConfig};

/// Helper to build a manual System of size `n`
///
/// Deterministic trig placement, no rand needed. Every body gets one
/// attractor near its start point and one of four cluster ids so that all
/// five force terms do real work.
fn make_system(n: usize) -> System {
    let mut bodies = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        let x = NVec3::new(
            (i_f * 0.37).sin() * 50.0,
            (i_f * 0.13).cos().abs() * 5.0,
            (i_f * 0.07).sin() * 50.0,
        );

        bodies.push(Body {
            x,
            v: NVec3::zeros(),
            a: (i_f * 0.11).sin() * 0.1,
            b: (i_f * 0.17).cos() * 3.0,
            c: (i % 4) as f64,
            d: 0.5,
            attractors: vec![Attractor {
                x: x.x + (i_f * 0.23).cos() * 10.0,
                z: x.z + (i_f * 0.29).sin() * 10.0,
                w: 1.0,
            }],
            name: None,
        });
    }

    System { bodies, step: 0 }
}

/// Time one force pass, sequential vs the worker pool, over a range of N.
pub fn bench_forces() {
    let ns = [64, 128, 256, 512, 1024, 2048];

    for n in ns {
        let sys = make_system(n);
        let params = Parameters::default();
        let forces = ForceSet::standard(&params);
        let pool = WorkerPool::new(bounded_threads(n)).expect("worker pool");

        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        forces.accumulate_forces(&sys, &mut out);
        pool.accumulate_forces(&forces, &sys, &mut out);

        // Time sequential
        let t0 = Instant::now();
        forces.accumulate_forces(&sys, &mut out);
        let dt_seq = t0.elapsed().as_secs_f64();

        // Time parallel
        let t1 = Instant::now();
        pool.accumulate_forces(&forces, &sys, &mut out);
        let dt_par = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, sequential = {:8.6} s, parallel({}) = {:8.6} s",
            dt_seq,
            pool.threads(),
            dt_par
        );
    }
}

/// Time whole relaxation runs (capped step count) and report steps/second.
pub fn bench_relax() {
    let ns = [64, 128, 256, 512, 1024];
    let cap = 200; // enough steps to be representative without minutes of runtime

    for n in ns {
        for strategy in [StrategyConfig::Sequential, StrategyConfig::Parallel] {
            let mut params = Parameters::default();
            params.max_steps = cap;
            params.force_threshold = 1e-12; // unreachably low, always runs `cap` steps

            let mut scenario = Scenario {
                engine: Engine {
                    strategy,
                    threads: None,
                    residual: ResidualConfig::Max,
                    adaptive: None,
                },
                forces: ForceSet::standard(&params),
                parameters: params,
                system: make_system(n),
            };

            let t0 = Instant::now();
            let report = relax(&mut scenario, &CancelToken::new()).expect("relax");
            let elapsed = t0.elapsed().as_secs_f64();

            println!(
                "N = {n:5}, {strategy:?}: {:8.1} steps/s ({} steps in {:.3} s)",
                report.steps as f64 / elapsed,
                report.steps,
                elapsed
            );
        }
    }
}
