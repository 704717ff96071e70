//! OHLCV observation representation.

use chrono::NaiveDateTime;

/// One validated price record. `Copy`, so every holder owns its own value and
/// nothing can reach back into the table it was read from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_observation() -> Observation {
        Observation {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn copies_are_independent() {
        let original = sample_observation();
        let mut copy = original;
        copy.close = 0.0;
        copy.volume = 1.0;
        assert_eq!(original.close, 105.0);
        assert_eq!(original.volume, 50_000.0);
    }
}
