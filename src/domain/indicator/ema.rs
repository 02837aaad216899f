//! Streaming exponential moving average.
//!
//! k = 2/(n+1), seeded with the SMA of the first n inputs, then
//! EMA = x*k + EMA_prev*(1-k). Not ready for the first (n-1) inputs.

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    k: f64,
    seed_sum: f64,
    count: usize,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "ema period must be positive");
        Self {
            period,
            k: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            count: 0,
            value: None,
        }
    }

    pub fn update(&mut self, x: f64) {
        self.count += 1;
        match self.value {
            Some(prev) => self.value = Some(x * self.k + prev * (1.0 - self.k)),
            None => {
                self.seed_sum += x;
                if self.count == self.period {
                    self.value = Some(self.seed_sum / self.period as f64);
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    pub fn current(&self) -> Option<f64> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn warmup_then_sma_seed() {
        let mut ema = Ema::new(3);
        ema.update(10.0);
        ema.update(20.0);
        assert!(!ema.is_ready());
        assert_eq!(ema.current(), None);
        ema.update(30.0);
        assert_relative_eq!(ema.current().unwrap(), 20.0);
    }

    #[test]
    fn recursive_step() {
        let mut ema = Ema::new(3);
        for x in [10.0, 20.0, 30.0, 40.0, 50.0] {
            ema.update(x);
        }
        let k = 0.5;
        let e3 = 40.0 * k + 20.0 * (1.0 - k);
        let e4 = 50.0 * k + e3 * (1.0 - k);
        assert_relative_eq!(ema.current().unwrap(), e4);
    }

    #[test]
    fn period_one_tracks_input() {
        let mut ema = Ema::new(1);
        ema.update(7.0);
        assert_relative_eq!(ema.current().unwrap(), 7.0);
        ema.update(9.0);
        assert_relative_eq!(ema.current().unwrap(), 9.0);
    }
}
