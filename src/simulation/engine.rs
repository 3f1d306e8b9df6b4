//! High-level runtime engine settings
//!
//! Selects the execution strategy (sequential/parallel), the residual
//! aggregation policy, and the optional adaptive step-sizing pairs used
//! when driving a `Scenario` to convergence

use crate::configuration::config::{ResidualConfig, StrategyConfig};

/// One `(dt, max_disp)` integration pair. `max_disp` caps the distance a
/// body may travel in a single step.
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    pub dt: f64,
    pub max_disp: f64,
}

/// Coarse/fine step-sizing policy: coarse parameters while the residual is
/// large, fine parameters once it drops below `refine_below` to avoid
/// overshoot near equilibrium.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveStep {
    pub coarse: StepParams,
    pub fine: StepParams,
    pub refine_below: f64, // residual level at which to switch to `fine`
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub strategy: StrategyConfig, // sequential or parallel force evaluation
    pub threads: Option<usize>, // worker count override for the parallel strategy
    pub residual: ResidualConfig, // max or sum aggregation
    pub adaptive: Option<AdaptiveStep>, // coarse/fine stepping, off by default
}

impl Engine {
    /// Step parameters for the upcoming integration, given the residual just
    /// observed. Falls back to `base` when adaptive stepping is off.
    pub fn step_params(&self, residual: f64, base: StepParams) -> StepParams {
        match &self.adaptive {
            Some(a) if residual < a.refine_below => a.fine,
            Some(a) => a.coarse,
            None => base,
        }
    }
}
