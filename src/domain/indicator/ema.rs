//! Streaming Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n closes, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). The first (n-1) updates yield `None`.

#[derive(Debug, Clone, PartialEq)]
pub struct Ema {
    period: usize,
    k: f64,
    sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Ema {
            period,
            k: 2.0 / (period as f64 + 1.0),
            sum: 0.0,
            seen: 0,
            value: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Feed one close. A zero period never becomes ready.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        self.value = match self.value {
            Some(prev) => Some(close * self.k + prev * (1.0 - self.k)),
            None => {
                self.sum += close;
                self.seen += 1;
                (self.seen == self.period).then(|| self.sum / self.period as f64)
            }
        };
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(ema: &mut Ema, prices: &[f64]) -> Vec<Option<f64>> {
        prices.iter().map(|&p| ema.update(p)).collect()
    }

    #[test]
    fn ema_warmup() {
        let mut ema = Ema::new(3);
        let values = feed(&mut ema, &[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert!(values[0].is_none());
        assert!(values[1].is_none());
        assert!(values[2..].iter().all(Option::is_some));
    }

    #[test]
    fn ema_period_1() {
        let mut ema = Ema::new(1);
        let values = feed(&mut ema, &[10.0, 20.0, 30.0]);
        assert!((values[0].unwrap() - 10.0).abs() < f64::EPSILON);
        assert!((values[1].unwrap() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let mut ema = Ema::new(3);
        let values = feed(&mut ema, &[10.0, 20.0, 30.0, 40.0, 50.0]);

        let k = 2.0 / 4.0;
        let sma = (10.0 + 20.0 + 30.0) / 3.0;
        assert!((values[2].unwrap() - sma).abs() < f64::EPSILON);

        let ema_3 = 40.0 * k + sma * (1.0 - k);
        assert!((values[3].unwrap() - ema_3).abs() < f64::EPSILON);

        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);
        assert!((values[4].unwrap() - ema_4).abs() < f64::EPSILON);
        assert_eq!(ema.value(), values[4]);
    }

    #[test]
    fn ema_equal_prices() {
        let mut ema = Ema::new(3);
        let values = feed(&mut ema, &[100.0; 5]);
        for v in values.into_iter().flatten() {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_period_0() {
        let mut ema = Ema::new(0);
        assert!(feed(&mut ema, &[10.0, 20.0]).iter().all(Option::is_none));
    }
}
