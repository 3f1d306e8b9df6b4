//! Core state types for the layout simulation.
//!
//! Defines the runtime body/system structs:
//! - `Attractor` – a fixed weighted target point on the ground plane
//! - `Body` – one simulated particle with its scalar properties
//! - `System` – the full mutable simulation state
//!
//! The ground plane is x/z; y is the vertical axis. A body's identity is its
//! index in `System::bodies`: bodies are neither added nor removed during a
//! run, so the index is stable and doubles as the output ordering.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

/// Fixed weighted target point pulling one specific body in the ground plane.
/// Read-only for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Attractor {
    pub x: f64, // ground-plane x coordinate
    pub z: f64, // ground-plane z coordinate
    pub w: f64, // pull strength, non-negative
}

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub a: f64, // gravity modifier
    pub b: f64, // buoyancy modifier, also seeds the initial height
    pub c: f64, // cluster id; bodies sharing c attract each other
    pub d: f64, // diameter, softens the repulsion contact distance
    pub attractors: Vec<Attractor>, // weighted ground-plane targets
    pub name: Option<String>, // external identifier carried through to output
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies
    pub step: u64, // completed integration steps
}
