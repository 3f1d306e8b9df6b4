//! Damped-Euler time integration for the layout system
//!
//! One step per call, driven by a precomputed force buffer and
//! `Parameters`/`StepParams`. Unit mass is assumed throughout, so the
//! force buffer doubles as the acceleration.

use crate::simulation::engine::StepParams;
use crate::simulation::params::Parameters;
use crate::simulation::states::{NVec3, System};

/// Advance the system by one damped-Euler step
///
/// For each body independently:
///   v_n+1 = damping * v_n + dt * f_n
///   x_n+1 = x_n + dt * v_n+1
///
/// The per-step displacement is clamped to `step.max_disp` so that a large
/// transient force cannot fling a body across the layout. Cross-body
/// coupling lives entirely in the force model; `forces[i]` must correspond
/// to `sys.bodies[i]`.
pub fn damped_euler(sys: &mut System, forces: &[NVec3], params: &Parameters, step: &StepParams) {
    for (b, f) in sys.bodies.iter_mut().zip(forces.iter()) {
        // Damped velocity update (unit mass: force == acceleration)
        b.v = params.damping * b.v + step.dt * *f;

        // Clamp the displacement, not the velocity, so the damping history
        // is unaffected by the cap
        let mut disp = step.dt * b.v;
        let len = disp.norm();
        if len > step.max_disp {
            disp *= step.max_disp / len;
        }
        b.x += disp;
    }
    sys.step += 1;
}
