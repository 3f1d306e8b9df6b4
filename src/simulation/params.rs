//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - the five force constants (attractor, cluster, repulsion, gravity, buoyancy),
//! - integration step size and velocity damping,
//! - the convergence threshold, its population scaling rule, and the step cap,
//! - repulsion softening and the numerical safety floor `eps`

#[derive(Debug, Clone)]
pub struct Parameters {
    pub k_attractor: f64, // attractor pull scale
    pub k_cluster: f64, // intra-cluster attraction scale
    pub k_repulsion: f64, // pairwise repulsion scale
    pub k_gravity: f64, // vertical restoring force scale
    pub k_buoyancy: f64, // vertical lift scale
    pub dt: f64, // integration time step
    pub damping: f64, // velocity damping, strictly inside (0, 1)
    pub force_threshold: f64, // stop when the residual drops below this
    pub scale_threshold: bool, // multiply the threshold by the body count
    pub max_steps: u64, // hard cap to avoid runaway runs
    pub softening: f64, // contact-distance factor in the repulsion denominator
    pub eps: f64, // small epsilon flooring repulsion denominators
    pub baseline: f64, // offset added to `a`/`b` in the vertical terms
    pub floor_force: f64, // constant upward force applied below the ground plane
}

impl Default for Parameters {
    /// Reference constants of the layout model.
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
