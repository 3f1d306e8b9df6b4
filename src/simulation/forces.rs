//! Force contributors for the layout engine
//!
//! Each term implements [`Force`] and adds its contribution into a shared
//! per-body force buffer. Two evaluation paths are exposed:
//! - `accumulate` – whole-array pass, pairwise terms applied equal-and-opposite
//! - `force_on` – the total contribution to a single body, used by the
//!   parallel evaluator so that workers only ever write their own slot
//!
//! All terms are pure over `&System`; nothing here mutates body state.

use crate::simulation::states::{Body, NVec3, System};
use crate::simulation::params::Parameters;

/// Collection of force terms (attractor pull, repulsion, etc.)
/// Contributions from every registered term are summed into a single
/// force vector per body
pub struct ForceSet {
    terms: Vec<Box<dyn Force + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term
    pub fn with(mut self, term: impl Force + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// The standard five-term layout model, wired from `params`.
    pub fn standard(params: &Parameters) -> Self {
        Self::new()
            .with(AttractorPull { k: params.k_attractor })
            .with(ClusterAttraction { k: params.k_cluster })
            .with(PairRepulsion {
                k: params.k_repulsion,
                softening: params.softening,
                eps: params.eps,
            })
            .with(Gravity {
                k: params.k_gravity,
                baseline: params.baseline,
                floor: params.floor_force,
            })
            .with(Buoyancy {
                k: params.k_buoyancy,
                baseline: params.baseline,
                floor: params.floor_force,
            })
    }

    /// Compute total forces for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_forces(&self, sys: &System, out: &mut [NVec3]) {
        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        // Iterate over all force contributors
        for term in &self.terms {
            term.accumulate(sys, out);
        }
    }

    /// Total force on body `i` alone, summed over all terms.
    pub fn force_on(&self, i: usize, sys: &System) -> NVec3 {
        self.terms
            .iter()
            .fold(NVec3::zeros(), |acc, term| acc + term.force_on(i, sys))
    }
}

/// Trait for force sources operating on [`System`]
///
/// `accumulate` adds each term's contribution into `out[i]` for every body;
/// `force_on` computes the same contribution for one body in isolation. The
/// two must agree (up to floating-point association) for the sequential and
/// parallel strategies to be interchangeable.
pub trait Force {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]);
    fn force_on(&self, i: usize, sys: &System) -> NVec3;
}

/// Per-body attractor pull, acting in the ground plane only
///
/// For each attractor of body i:
///   f += w * k * (attractor_xz - body_xz)
/// The vertical component is always zero.
pub struct AttractorPull {
    pub k: f64,
}

impl Force for AttractorPull {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]) {
        for (i, f) in out.iter_mut().enumerate() {
            *f += self.force_on(i, sys);
        }
    }

    fn force_on(&self, i: usize, sys: &System) -> NVec3 {
        let body = &sys.bodies[i];
        let mut f = NVec3::zeros();
        for att in &body.attractors {
            let scale = att.w * self.k;
            f.x += scale * (att.x - body.x.x);
            f.z += scale * (att.z - body.x.z);
        }
        f
    }
}

/// Intra-cluster pairwise attraction on the ground plane
///
/// For every unordered pair (i, j) with c_i == c_j:
///   f_i +=  k * (c_i + c_j) * (xz_j - xz_i)
///   f_j += -k * (c_i + c_j) * (xz_j - xz_i)
/// Quadratic in cluster size; clusters are small in the intended workloads.
pub struct ClusterAttraction {
    pub k: f64,
}

impl ClusterAttraction {
    /// Planar pull on `bi` toward its cluster peer `bj`.
    fn pair_force(&self, bi: &Body, bj: &Body) -> NVec3 {
        let strength = self.k * (bi.c + bj.c);
        NVec3::new(
            strength * (bj.x.x - bi.x.x),
            0.0,
            strength * (bj.x.z - bi.x.z),
        )
    }
}

impl Force for ClusterAttraction {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]) {
        let n = sys.bodies.len();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let bi = &sys.bodies[i];
            for j in (i + 1)..n {
                let bj = &sys.bodies[j];
                if bi.c != bj.c {
                    continue;
                }
                let f = self.pair_force(bi, bj);
                out[i] += f;
                out[j] -= f; // equal and opposite
            }
        }
    }

    fn force_on(&self, i: usize, sys: &System) -> NVec3 {
        let bi = &sys.bodies[i];
        let mut f = NVec3::zeros();
        for (j, bj) in sys.bodies.iter().enumerate() {
            if j == i || bj.c != bi.c {
                continue;
            }
            f += self.pair_force(bi, bj);
        }
        f
    }
}

/// Pairwise repulsion in full 3D, between all body pairs regardless of cluster
///
/// magnitude  = k / max(eps, dist - softening * (d_i + d_j))
/// direction  = (x_i - x_j) / max(dist, eps)
///
/// The denominator floor keeps the force finite as bodies approach the
/// softened contact distance. At exactly coincident positions the direction
/// numerator is the zero vector, so the pair contributes zero force; both
/// evaluation paths share this rule through `pair_force`.
pub struct PairRepulsion {
    pub k: f64,
    pub softening: f64,
    pub eps: f64,
}

impl PairRepulsion {
    /// Repulsive force on `bi` due to `bj` (points away from `bj`).
    fn pair_force(&self, bi: &Body, bj: &Body) -> NVec3 {
        let rij = bi.x - bj.x;
        let dist = rij.norm();
        let denom = (dist - self.softening * (bi.d + bj.d)).max(self.eps);
        let mag = self.k / denom;
        let dir = rij / dist.max(self.eps);
        mag * dir
    }
}

impl Force for PairRepulsion {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]) {
        let n = sys.bodies.len();

        for i in 0..n {
            let bi = &sys.bodies[i];
            for j in (i + 1)..n {
                let bj = &sys.bodies[j];
                let f = self.pair_force(bi, bj);
                out[i] += f;
                out[j] -= f; // equal and opposite
            }
        }
    }

    fn force_on(&self, i: usize, sys: &System) -> NVec3 {
        let bi = &sys.bodies[i];
        let mut f = NVec3::zeros();
        for (j, bj) in sys.bodies.iter().enumerate() {
            if j == i {
                continue;
            }
            f += self.pair_force(bi, bj);
        }
        f
    }
}

/// Vertical restoring force toward the ground plane
///
/// Above ground (y >= 0) the pull is proportional to height:
///   f_y = -k * (baseline + a_i) * y_i
/// Below ground a large fixed force pushes the body back up. The
/// discontinuity is intentional: the floor is a wall, not a potential.
pub struct Gravity {
    pub k: f64,
    pub baseline: f64,
    pub floor: f64,
}

impl Force for Gravity {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]) {
        for (i, f) in out.iter_mut().enumerate() {
            *f += self.force_on(i, sys);
        }
    }

    fn force_on(&self, i: usize, sys: &System) -> NVec3 {
        let body = &sys.bodies[i];
        let fy = if body.x.y >= 0.0 {
            -self.k * (self.baseline + body.a) * body.x.y
        } else {
            self.floor
        };
        NVec3::new(0.0, fy, 0.0)
    }
}

/// Constant vertical lift, opposing gravity above the ground plane
///
/// f_y = +k * (baseline + b_i) for y >= 0, the same floor force below.
/// Together with [`Gravity`] this sets an equilibrium height at
/// y = k_b * (baseline + b) / (k_g * (baseline + a)).
pub struct Buoyancy {
    pub k: f64,
    pub baseline: f64,
    pub floor: f64,
}

impl Force for Buoyancy {
    fn accumulate(&self, sys: &System, out: &mut [NVec3]) {
        for (i, f) in out.iter_mut().enumerate() {
            *f += self.force_on(i, sys);
        }
    }

    fn force_on(&self, i: usize, sys: &System) -> NVec3 {
        let body = &sys.bodies[i];
        let fy = if body.x.y >= 0.0 {
            self.k * (self.baseline + body.b)
        } else {
            self.floor
        };
        NVec3::new(0.0, fy, 0.0)
    }
}
