//! Simulation engine and event loop.
//!
//! Per observation: guard the strategy's decision, execute at the close,
//! then record `cash + shares * close`. The engine owns a single-pass feed,
//! so it runs exactly once; build a new engine for another run.

use chrono::NaiveDateTime;
use log::{debug, info, warn};

use super::account::AccountState;
use super::error::SimtraderError;
use super::execution::{Fill, TradeExecutor};
use super::guard::{DecisionGuard, GuardConfig, TradeSignal};
use super::observation::Observation;
use super::price_series::{ObservationFeed, PriceSeries};
use super::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Ready,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRecord {
    /// Position of the triggering observation in the replay log.
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub fill: Fill,
}

/// Output of a completed run. `valuations[i]` is the account worth after
/// processing `observations[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub valuations: Vec<f64>,
    pub observations: Vec<Observation>,
    pub fills: Vec<FillRecord>,
    pub initial_investment: f64,
    pub final_cash: f64,
    pub final_shares: f64,
    pub strategy_failures: usize,
}

impl SimulationReport {
    pub fn final_valuation(&self) -> Option<f64> {
        self.valuations.last().copied()
    }
}

#[derive(Debug)]
pub struct SimulationEngine {
    feed: ObservationFeed,
    guard: DecisionGuard,
    state: EngineState,
}

impl SimulationEngine {
    pub fn new(series: PriceSeries, guard_config: GuardConfig) -> Self {
        SimulationEngine {
            feed: series.into_feed(),
            guard: DecisionGuard::new(guard_config),
            state: EngineState::Ready,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Replay the whole series against `strategy`.
    ///
    /// Fails with `ConfigInvalid` (engine stays `Ready`) if the investment
    /// is not a positive finite amount, and with `Reuse` on any call after
    /// the first accepted one.
    pub fn run<S>(
        &mut self,
        strategy: &mut S,
        initial_investment: f64,
    ) -> Result<SimulationReport, SimtraderError>
    where
        S: Strategy + ?Sized,
    {
        if self.state != EngineState::Ready {
            return Err(SimtraderError::Reuse);
        }
        if !(initial_investment.is_finite() && initial_investment > 0.0) {
            return Err(SimtraderError::ConfigInvalid {
                section: "simulation".into(),
                key: "initial_investment".into(),
                reason: format!("must be a positive amount, got {}", initial_investment),
            });
        }

        self.state = EngineState::Running;
        info!(
            "running {} over {} observations with {:.2} initial investment",
            strategy.name(),
            self.feed.len(),
            initial_investment
        );
        let result = self.replay(strategy, initial_investment);
        self.state = EngineState::Finished;

        if let Ok(report) = &result {
            info!(
                "finished: {} valuations, {} fills, final value {:.2}, {} strategy failures",
                report.valuations.len(),
                report.fills.len(),
                report.final_valuation().unwrap_or(initial_investment),
                report.strategy_failures
            );
        }
        result
    }

    fn replay<S>(
        &mut self,
        strategy: &mut S,
        initial_investment: f64,
    ) -> Result<SimulationReport, SimtraderError>
    where
        S: Strategy + ?Sized,
    {
        let mut account = AccountState::new(initial_investment)?;
        let mut valuations = Vec::with_capacity(self.feed.len());
        let mut observations = Vec::with_capacity(self.feed.len());
        let mut fills = Vec::new();

        while let Some(observation) = self.feed.next() {
            let signal = self.guard.decide(strategy, &observation);
            if let Some(fill) = execute(&mut account, signal, &observation)? {
                debug!(
                    "{} {} {:.6} shares at {:.4} (cash {:+.2})",
                    observation.timestamp, fill.side, fill.shares, fill.price, fill.cash_delta
                );
                fills.push(FillRecord {
                    index: observations.len(),
                    timestamp: observation.timestamp,
                    fill,
                });
            }

            valuations.push(account.valuation(observation.close));
            observations.push(observation);
        }

        Ok(SimulationReport {
            valuations,
            observations,
            fills,
            initial_investment,
            final_cash: account.cash(),
            final_shares: account.shares(),
            strategy_failures: self.guard.failures(),
        })
    }
}

fn execute(
    account: &mut AccountState,
    signal: TradeSignal,
    observation: &Observation,
) -> Result<Option<Fill>, SimtraderError> {
    if signal.is_hold() {
        return Ok(None);
    }

    let mut executor = TradeExecutor::new(account);
    let result = if signal.is_buy() {
        executor.buy(signal.value(), observation.close)
    } else {
        executor.sell(signal.value(), observation.close)
    };
    match result {
        Ok(fill) => Ok(Some(fill)),
        Err(SimtraderError::InvalidPrice { price }) => {
            warn!(
                "cannot trade at close {} on {}; holding",
                price, observation.timestamp
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
