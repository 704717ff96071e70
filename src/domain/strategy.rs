//! Strategy seam: the only way user logic reaches the simulation.
//!
//! A strategy sees one observation per call plus whatever it chose to keep
//! from earlier calls. It never sees the account or future observations.

use super::error::{SimtraderError, StrategyError};
use super::indicator::Ema;
use super::observation::Observation;

pub trait Strategy {
    /// Map an observation to a raw signal. Positive buys that fraction of
    /// cash, negative sells that fraction of shares, zero holds. Values
    /// outside [-1, 1] are clamped by the decision guard.
    fn decide(&mut self, observation: &Observation) -> Result<f64, StrategyError>;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Strategy for F
where
    F: FnMut(&Observation) -> Result<f64, StrategyError>,
{
    fn decide(&mut self, observation: &Observation) -> Result<f64, StrategyError> {
        self(observation)
    }
}

/// Never trades.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hold;

impl Strategy for Hold {
    fn decide(&mut self, _observation: &Observation) -> Result<f64, StrategyError> {
        Ok(0.0)
    }

    fn name(&self) -> &str {
        "hold"
    }
}

/// Buys `fraction` of cash on the first observation, then holds.
#[derive(Debug, Clone)]
pub struct BuyAndHold {
    fraction: f64,
    entered: bool,
}

impl BuyAndHold {
    pub fn new(fraction: f64) -> Result<Self, SimtraderError> {
        check_fraction(fraction)?;
        Ok(BuyAndHold {
            fraction,
            entered: false,
        })
    }
}

impl Strategy for BuyAndHold {
    fn decide(&mut self, _observation: &Observation) -> Result<f64, StrategyError> {
        if self.entered {
            return Ok(0.0);
        }
        self.entered = true;
        Ok(self.fraction)
    }

    fn name(&self) -> &str {
        "buy_and_hold"
    }
}

/// Buys `fraction` of cash when the fast EMA crosses above the slow EMA and
/// sells the whole position when it crosses back below.
#[derive(Debug, Clone)]
pub struct EmaCrossover {
    fast: Ema,
    slow: Ema,
    fraction: f64,
    prev_spread: Option<f64>,
}

impl EmaCrossover {
    pub fn new(fast_period: usize, slow_period: usize, fraction: f64) -> Result<Self, SimtraderError> {
        if fast_period == 0 || fast_period >= slow_period {
            return Err(SimtraderError::ConfigInvalid {
                section: "strategy".into(),
                key: "fast_period".into(),
                reason: format!(
                    "fast_period ({}) must be positive and below slow_period ({})",
                    fast_period, slow_period
                ),
            });
        }
        check_fraction(fraction)?;
        Ok(EmaCrossover {
            fast: Ema::new(fast_period),
            slow: Ema::new(slow_period),
            fraction,
            prev_spread: None,
        })
    }
}

impl Strategy for EmaCrossover {
    fn decide(&mut self, observation: &Observation) -> Result<f64, StrategyError> {
        let fast = self.fast.update(observation.close);
        let slow = self.slow.update(observation.close);
        let (Some(fast), Some(slow)) = (fast, slow) else {
            return Ok(0.0);
        };

        let spread = fast - slow;
        let signal = match self.prev_spread {
            Some(prev) if prev <= 0.0 && spread > 0.0 => self.fraction,
            Some(prev) if prev >= 0.0 && spread < 0.0 => -1.0,
            _ => 0.0,
        };
        self.prev_spread = Some(spread);
        Ok(signal)
    }

    fn name(&self) -> &str {
        "ema_crossover"
    }
}

fn check_fraction(fraction: f64) -> Result<(), SimtraderError> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(SimtraderError::ConfigInvalid {
            section: "strategy".into(),
            key: "fraction".into(),
            reason: "fraction must be in (0, 1]".into(),
        })
    }
}
