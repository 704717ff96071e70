//! CSV valuation report adapter.
//!
//! One row per replayed observation: `timestamp,close,cash_flow,valuation`,
//! where `cash_flow` is the signed cash change from a fill on that observation
//! (0 when the strategy held).

use crate::domain::engine::SimulationReport;
use crate::domain::error::SimtraderError;
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn render(report: &SimulationReport) -> Result<String, SimtraderError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        let to_data_err = |e: csv::Error| SimtraderError::Data {
            reason: format!("CSV write error: {}", e),
        };

        wtr.write_record(["timestamp", "close", "cash_flow", "valuation"])
            .map_err(to_data_err)?;

        let mut fills = report.fills.iter().peekable();
        for (i, (obs, valuation)) in report.observations.iter().zip(&report.valuations).enumerate() {
            let mut cash_flow = 0.0;
            while let Some(record) = fills.next_if(|r| r.index == i) {
                cash_flow += record.fill.cash_delta;
            }
            wtr.write_record([
                obs.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                obs.close.to_string(),
                cash_flow.to_string(),
                valuation.to_string(),
            ])
            .map_err(to_data_err)?;
        }

        let bytes = wtr.into_inner().map_err(|e| SimtraderError::Data {
            reason: format!("CSV flush error: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| SimtraderError::Data {
            reason: format!("CSV encoding error: {}", e),
        })
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &SimulationReport, output_path: &Path) -> Result<(), SimtraderError> {
        let content = Self::render(report)?;
        std::fs::write(output_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engine::FillRecord;
    use crate::domain::execution::{Fill, Side};
    use crate::domain::observation::Observation;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_report() -> SimulationReport {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        let t1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 30, 0).unwrap();
        let obs = |timestamp: chrono::NaiveDateTime, close: f64| Observation {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        };
        SimulationReport {
            valuations: vec![10_000.0, 11_000.0],
            observations: vec![obs(t0, 100.0), obs(t1, 110.0)],
            fills: vec![FillRecord {
                index: 0,
                timestamp: t0,
                fill: Fill {
                    side: Side::Buy,
                    fraction: 1.0,
                    price: 100.0,
                    shares: 100.0,
                    cash_delta: -10_000.0,
                },
            }],
            initial_investment: 10_000.0,
            final_cash: 0.0,
            final_shares: 100.0,
            strategy_failures: 0,
        }
    }

    #[test]
    fn render_one_row_per_observation() {
        let csv = CsvReportAdapter::render(&sample_report()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,close,cash_flow,valuation");
        assert_eq!(lines[1], "2024-01-01 09:30:00,100,-10000,10000");
        assert_eq!(lines[2], "2024-01-02 09:30:00,110,0,11000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        CsvReportAdapter.write(&sample_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("timestamp,close,cash_flow,valuation"));
    }
}
