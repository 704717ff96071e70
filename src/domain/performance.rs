//! Performance summary over a valuation history.
//!
//! Returns are per observation, not annualised: the series may be daily,
//! intraday, or irregular, and only the caller knows its frequency.

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub mean_return: f64,
    pub std_dev: f64,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
}

/// (expected - risk_free) / std_dev, or `None` when the ratio is undefined.
pub fn sharpe_ratio(expected_return: f64, risk_free_return: f64, std_dev: f64) -> Option<f64> {
    if std_dev > 0.0 && std_dev.is_finite() {
        Some((expected_return - risk_free_return) / std_dev)
    } else {
        None
    }
}

/// Simple returns between consecutive valuations; a non-positive previous
/// valuation contributes 0.
pub fn period_returns(valuations: &[f64]) -> Vec<f64> {
    valuations
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(valuations: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;
    for &value in valuations {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - value) / peak);
        }
    }
    max_dd
}

/// `None` for an empty history.
pub fn summarize(valuations: &[f64], risk_free_return: f64) -> Option<PerformanceSummary> {
    let first = *valuations.first()?;
    let last = *valuations.last()?;

    let total_return = if first > 0.0 { (last - first) / first } else { 0.0 };

    let returns = period_returns(valuations);
    let (mean_return, std_dev) = if returns.is_empty() {
        (0.0, 0.0)
    } else {
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        (mean, variance.sqrt())
    };

    Some(PerformanceSummary {
        total_return,
        mean_return,
        std_dev,
        sharpe_ratio: sharpe_ratio(mean_return, risk_free_return, std_dev),
        max_drawdown: max_drawdown(valuations),
    })
}
