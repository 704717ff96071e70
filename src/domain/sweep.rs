//! Parameter sweeps: many isolated runs over the same series, in parallel.
//!
//! Each case gets its own clone of the series, its own engine, and its own
//! strategy instance, so nothing mutable is shared between runs.

use rayon::prelude::*;

use super::engine::{SimulationEngine, SimulationReport};
use super::error::SimtraderError;
use super::guard::GuardConfig;
use super::price_series::PriceSeries;
use super::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepCase {
    pub label: String,
    pub initial_investment: f64,
    pub guard: GuardConfig,
}

#[derive(Debug)]
pub struct SweepOutcome {
    pub label: String,
    pub result: Result<SimulationReport, SimtraderError>,
}

/// Run every case; outcomes come back in case order.
pub fn run_sweep<F, S>(series: &PriceSeries, cases: &[SweepCase], make_strategy: F) -> Vec<SweepOutcome>
where
    F: Fn(&SweepCase) -> Result<S, SimtraderError> + Sync,
    S: Strategy,
{
    cases
        .par_iter()
        .map(|case| {
            let result = make_strategy(case).and_then(|mut strategy| {
                SimulationEngine::new(series.clone(), case.guard)
                    .run(&mut strategy, case.initial_investment)
            });
            SweepOutcome {
                label: case.label.clone(),
                result,
            }
        })
        .collect()
}
