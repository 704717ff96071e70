//! Decision guard: the containment boundary around user strategies.
//!
//! Raw signals are clamped to `[-max_sell_pct, max_buy_pct]`. A strategy
//! that returns an error, returns NaN, or panics is logged at warn level and
//! treated as holding for that observation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::warn;

use super::error::{SimtraderError, StrategyError};
use super::observation::Observation;
use super::strategy::Strategy;

/// Per-run trade size limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardConfig {
    pub max_buy_pct: f64,
    pub max_sell_pct: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            max_buy_pct: 1.0,
            max_sell_pct: 1.0,
        }
    }
}

impl GuardConfig {
    pub fn new(max_buy_pct: f64, max_sell_pct: f64) -> Result<Self, SimtraderError> {
        for (key, value) in [("max_buy_pct", max_buy_pct), ("max_sell_pct", max_sell_pct)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(SimtraderError::ConfigInvalid {
                    section: "guard".into(),
                    key: key.into(),
                    reason: format!("{} must be in (0, 1], got {}", key, value),
                });
            }
        }
        Ok(GuardConfig {
            max_buy_pct,
            max_sell_pct,
        })
    }
}

/// A signal that has passed the guard and is safe to hand to the executor.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TradeSignal(f64);

impl TradeSignal {
    pub const HOLD: TradeSignal = TradeSignal(0.0);

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_buy(self) -> bool {
        self.0 > 0.0
    }

    pub fn is_sell(self) -> bool {
        self.0 < 0.0
    }

    pub fn is_hold(self) -> bool {
        self.0 == 0.0
    }
}

#[derive(Debug, Clone)]
pub struct DecisionGuard {
    config: GuardConfig,
    failures: usize,
}

impl DecisionGuard {
    pub fn new(config: GuardConfig) -> Self {
        DecisionGuard {
            config,
            failures: 0,
        }
    }

    pub fn config(&self) -> GuardConfig {
        self.config
    }

    /// Number of observations on which the strategy failed and was held.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn decide<S>(&mut self, strategy: &mut S, observation: &Observation) -> TradeSignal
    where
        S: Strategy + ?Sized,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| strategy.decide(observation)));
        let raw = match outcome {
            Ok(Ok(raw)) if raw.is_nan() => {
                return self.recover(observation, &StrategyError::new("signal is NaN"));
            }
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => return self.recover(observation, &err),
            Err(payload) => {
                let err = StrategyError::new(format!("panicked: {}", panic_message(&*payload)));
                return self.recover(observation, &err);
            }
        };

        let clamped = raw.clamp(-self.config.max_sell_pct, self.config.max_buy_pct);
        if clamped == 0.0 {
            TradeSignal::HOLD
        } else {
            TradeSignal(clamped)
        }
    }

    fn recover(&mut self, observation: &Observation, err: &StrategyError) -> TradeSignal {
        self.failures += 1;
        warn!(
            "strategy failed at {}: {}; holding position",
            observation.timestamp, err
        );
        TradeSignal::HOLD
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".into()
    }
}
