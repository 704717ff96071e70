//! Validated, time-ordered price series and its single-pass feed.
//!
//! Validation steps, in order:
//! 1. every required column must be present (`Schema`)
//! 2. at least one row must exist (`EmptyInput`)
//! 3. cells are parsed; malformed, negative, or infinite values are rejected
//! 4. rows are stable-sorted by timestamp, rows without one going last
//! 5. missing cells are forward-filled from the previous row
//! 6. leading rows that still have gaps are dropped
//!
//! The feed consumes the series and only moves forward, so a strategy can
//! never see an observation before its turn or see one twice.

use std::iter::FusedIterator;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use super::error::SimtraderError;
use super::observation::Observation;
use super::raw_table::{RawTable, REQUIRED_COLUMNS};

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A row after parsing but before gaps are repaired.
#[derive(Debug, Clone)]
struct PartialRow {
    source_row: usize,
    timestamp: Option<NaiveDateTime>,
    values: [Option<f64>; 5],
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    observations: Vec<Observation>,
}

impl PriceSeries {
    pub fn validate(table: &RawTable) -> Result<Self, SimtraderError> {
        let mut indices = [0usize; 6];
        for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = table
                .column_index(name)
                .ok_or_else(|| SimtraderError::Schema {
                    column: name.to_string(),
                })?;
        }

        if table.is_empty() {
            return Err(SimtraderError::EmptyInput);
        }

        let mut rows = (0..table.len())
            .map(|row| parse_row(table, row, &indices))
            .collect::<Result<Vec<_>, _>>()?;

        rows.sort_by_key(|r| (r.timestamp.is_none(), r.timestamp));

        forward_fill(&mut rows);

        let observations: Vec<Observation> = rows
            .into_iter()
            .skip_while(|r| {
                let incomplete = r.timestamp.is_none() || r.values.iter().any(Option::is_none);
                if incomplete {
                    debug!("dropping leading row {} with unfillable gaps", r.source_row);
                }
                incomplete
            })
            .filter_map(|r| {
                let [open, high, low, close, volume] = r.values;
                Some(Observation {
                    timestamp: r.timestamp?,
                    open: open?,
                    high: high?,
                    low: low?,
                    close: close?,
                    volume: volume?,
                })
            })
            .collect();

        if observations.is_empty() {
            return Err(SimtraderError::EmptyInput);
        }

        Ok(PriceSeries { observations })
    }

    /// Build a series from already-typed observations. Applies the same
    /// ordering and value checks as [`PriceSeries::validate`].
    pub fn from_observations(mut observations: Vec<Observation>) -> Result<Self, SimtraderError> {
        if observations.is_empty() {
            return Err(SimtraderError::EmptyInput);
        }
        for (row, obs) in observations.iter().enumerate() {
            let fields = [obs.open, obs.high, obs.low, obs.close, obs.volume];
            for (name, value) in REQUIRED_COLUMNS[1..].iter().zip(fields) {
                check_value(value, row + 1, name)?;
            }
        }
        observations.sort_by_key(|o| o.timestamp);
        Ok(PriceSeries { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.observations.first().map(|o| o.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.observations.last().map(|o| o.timestamp)
    }

    /// Hand the observations over to a one-pass feed.
    pub fn into_feed(self) -> ObservationFeed {
        ObservationFeed {
            remaining: self.observations.into_iter(),
            yielded: 0,
        }
    }
}

/// Forward-only cursor over a validated series.
#[derive(Debug)]
pub struct ObservationFeed {
    remaining: std::vec::IntoIter<Observation>,
    yielded: usize,
}

impl ObservationFeed {
    /// Pull the next observation; once drained every further pull fails
    /// with `Exhausted` instead of restarting.
    pub fn try_next(&mut self) -> Result<Observation, SimtraderError> {
        self.next().ok_or(SimtraderError::Exhausted)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.len() == 0
    }

    pub fn yielded(&self) -> usize {
        self.yielded
    }
}

impl Iterator for ObservationFeed {
    type Item = Observation;

    fn next(&mut self) -> Option<Observation> {
        let obs = self.remaining.next()?;
        self.yielded += 1;
        Some(obs)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining.size_hint()
    }
}

impl ExactSizeIterator for ObservationFeed {}

impl FusedIterator for ObservationFeed {}

fn parse_row(
    table: &RawTable,
    row: usize,
    indices: &[usize; 6],
) -> Result<PartialRow, SimtraderError> {
    let timestamp = match table.cell(row, indices[0]) {
        Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| SimtraderError::InvalidValue {
            row: row + 1,
            column: "timestamp".into(),
            reason: format!("cannot parse '{}' as a date-time", raw.trim()),
        })?),
        None => None,
    };

    let mut values = [None; 5];
    for (i, slot) in values.iter_mut().enumerate() {
        let name = REQUIRED_COLUMNS[i + 1];
        if let Some(raw) = table.cell(row, indices[i + 1]) {
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|e| SimtraderError::InvalidValue {
                    row: row + 1,
                    column: name.into(),
                    reason: format!("'{}' is not a number: {}", raw.trim(), e),
                })?;
            *slot = Some(check_value(value, row + 1, name)?);
        }
    }

    Ok(PartialRow {
        source_row: row + 1,
        timestamp,
        values,
    })
}

fn check_value(value: f64, row: usize, column: &str) -> Result<f64, SimtraderError> {
    if !value.is_finite() {
        return Err(SimtraderError::InvalidValue {
            row,
            column: column.into(),
            reason: "value must be finite".into(),
        });
    }
    if value < 0.0 {
        return Err(SimtraderError::InvalidValue {
            row,
            column: column.into(),
            reason: format!("value {} must be non-negative", value),
        });
    }
    Ok(value)
}

fn forward_fill(rows: &mut [PartialRow]) {
    let mut last_timestamp: Option<NaiveDateTime> = None;
    let mut last_values: [Option<f64>; 5] = [None; 5];

    for row in rows.iter_mut() {
        match row.timestamp {
            Some(ts) => last_timestamp = Some(ts),
            None if last_timestamp.is_some() => {
                debug!("forward-filled timestamp in row {}", row.source_row);
                row.timestamp = last_timestamp;
            }
            None => {}
        }

        for (i, (value, last)) in row.values.iter_mut().zip(last_values.iter_mut()).enumerate() {
            match *value {
                Some(v) => *last = Some(v),
                None if last.is_some() => {
                    debug!(
                        "forward-filled {} in row {}",
                        REQUIRED_COLUMNS[i + 1],
                        row.source_row
                    );
                    *value = *last;
                }
                None => {}
            }
        }
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS` (space or `T`, optional fraction), RFC 3339,
/// or a bare date taken as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Some(ts) = TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(ts);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
