#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
pub use simtrader::domain::error::{SimtraderError, StrategyError};
pub use simtrader::domain::observation::Observation;
use simtrader::domain::price_series::PriceSeries;
use simtrader::domain::raw_table::{RawTable, REQUIRED_COLUMNS};
use std::io::Write;

/// 09:30 on the `day`-th day counting from 2024-01-01 (day 1).
pub fn timestamp(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
        + chrono::Duration::days(day as i64 - 1)
}

pub fn make_observation(day: u32, close: f64) -> Observation {
    Observation {
        timestamp: timestamp(day),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let observations = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_observation(i as u32 + 1, close))
        .collect();
    PriceSeries::from_observations(observations).unwrap()
}

/// Raw table with one row per close, one day apart.
pub fn table_from_closes(closes: &[f64]) -> RawTable {
    let mut table = RawTable::new(REQUIRED_COLUMNS);
    for (i, close) in closes.iter().enumerate() {
        let ts = timestamp(i as u32 + 1).format("%Y-%m-%d %H:%M:%S").to_string();
        let close = close.to_string();
        table.push_str_row(&[&ts, &close, &close, &close, &close, "1000"]);
    }
    table
}

/// Strategy returning a fixed script of signals, then holding.
pub fn scripted(signals: Vec<f64>) -> impl FnMut(&Observation) -> Result<f64, StrategyError> {
    let mut it = signals.into_iter();
    move |_| Ok(it.next().unwrap_or(0.0))
}

pub fn always_failing() -> impl FnMut(&Observation) -> Result<f64, StrategyError> {
    |o: &Observation| Err(StrategyError::new(format!("cannot decide at {}", o.timestamp)))
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub const PRICES_CSV: &str = "timestamp,open,high,low,close,volume\n\
    2024-01-02 09:30:00,110,111,109,110,1200\n\
    2024-01-01 09:30:00,100,101,99,100,1000\n\
    2024-01-03 09:30:00,120,121,119,120,900\n";
