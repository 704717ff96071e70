//! Configuration validation.
//!
//! Turns raw INI values into a typed [`SimulationConfig`], rejecting anything
//! malformed before a simulation starts.

use std::path::PathBuf;

use crate::domain::account::DEFAULT_INITIAL_INVESTMENT;
use crate::domain::error::SimtraderError;
use crate::domain::guard::GuardConfig;
use crate::domain::strategy::{BuyAndHold, EmaCrossover, Hold, Strategy};
use crate::ports::config_port::ConfigPort;

/// Which built-in strategy to run, with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyConfig {
    Hold,
    BuyAndHold {
        fraction: f64,
    },
    EmaCrossover {
        fast_period: usize,
        slow_period: usize,
        fraction: f64,
    },
}

impl StrategyConfig {
    pub fn build(&self) -> Result<Box<dyn Strategy + Send>, SimtraderError> {
        Ok(match *self {
            StrategyConfig::Hold => Box::new(Hold),
            StrategyConfig::BuyAndHold { fraction } => Box::new(BuyAndHold::new(fraction)?),
            StrategyConfig::EmaCrossover {
                fast_period,
                slow_period,
                fraction,
            } => Box::new(EmaCrossover::new(fast_period, slow_period, fraction)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_investment: f64,
    pub data_path: Option<PathBuf>,
    pub guard: GuardConfig,
    pub strategy: StrategyConfig,
    pub risk_free_rate: f64,
}

pub fn build_simulation_config(config: &dyn ConfigPort) -> Result<SimulationConfig, SimtraderError> {
    let initial_investment = validate_initial_investment(config)?;
    let guard = GuardConfig::new(
        read_double(config, "guard", "max_buy_pct", 1.0)?,
        read_double(config, "guard", "max_sell_pct", 1.0)?,
    )?;
    let strategy = validate_strategy_config(config)?;
    let risk_free_rate = read_double(config, "report", "risk_free_rate", 0.0)?;
    if !risk_free_rate.is_finite() {
        return Err(invalid("report", "risk_free_rate", "risk_free_rate must be finite"));
    }

    let data_path = config
        .get_string("simulation", "data")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    Ok(SimulationConfig {
        initial_investment,
        data_path,
        guard,
        strategy,
        risk_free_rate,
    })
}

fn validate_initial_investment(config: &dyn ConfigPort) -> Result<f64, SimtraderError> {
    let value = read_double(
        config,
        "simulation",
        "initial_investment",
        DEFAULT_INITIAL_INVESTMENT,
    )?;
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(
            "simulation",
            "initial_investment",
            "initial_investment must be positive",
        ));
    }
    Ok(value)
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, SimtraderError> {
    let kind = config
        .get_string("strategy", "kind")
        .map(|k| k.trim().to_lowercase())
        .unwrap_or_else(|| "hold".to_string());

    let strategy = match kind.as_str() {
        "hold" => StrategyConfig::Hold,
        "buy_and_hold" => StrategyConfig::BuyAndHold {
            fraction: read_double(config, "strategy", "fraction", 1.0)?,
        },
        "ema_crossover" => StrategyConfig::EmaCrossover {
            fast_period: read_period(config, "fast_period", 12)?,
            slow_period: read_period(config, "slow_period", 26)?,
            fraction: read_double(config, "strategy", "fraction", 1.0)?,
        },
        other => {
            return Err(invalid(
                "strategy",
                "kind",
                &format!(
                    "unknown strategy '{}' (expected hold, buy_and_hold, or ema_crossover)",
                    other
                ),
            ));
        }
    };

    // Constructing once surfaces parameter errors before any data is loaded.
    strategy.build()?;
    Ok(strategy)
}

/// A missing or blank key takes the default; a present, non-numeric value is
/// an error rather than a silent fallback.
fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SimtraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid(section, key, &format!("'{}' is not a number", raw.trim()))),
    }
}

fn read_period(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, SimtraderError> {
    match config.get_string("strategy", key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            invalid(
                "strategy",
                key,
                &format!("'{}' is not a whole number of observations", raw.trim()),
            )
        }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> SimtraderError {
    SimtraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
