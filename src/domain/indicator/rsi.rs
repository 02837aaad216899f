//! Streaming RSI with Wilder's smoothing.
//!
//! The first average gain/loss is the simple mean of the first n changes, then
//! avg = (prev_avg × (n-1) + current) / n.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), or 100 when avg_loss is zero.
//! Ready after n price changes (n+1 closes).

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    changes: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "rsi period must be positive");
        Self {
            period,
            prev_close: None,
            changes: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        }
    }

    pub fn update(&mut self, close: f64) {
        if let Some(prev) = self.prev_close {
            let change = close - prev;
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);
            let n = self.period as f64;
            self.changes += 1;

            if self.changes <= self.period {
                // Accumulate sums, turn them into the seed mean on the n-th change.
                self.avg_gain += gain;
                self.avg_loss += loss;
                if self.changes == self.period {
                    self.avg_gain /= n;
                    self.avg_loss /= n;
                }
            } else {
                self.avg_gain = (self.avg_gain * (n - 1.0) + gain) / n;
                self.avg_loss = (self.avg_loss * (n - 1.0) + loss) / n;
            }
        }
        self.prev_close = Some(close);
    }

    pub fn is_ready(&self) -> bool {
        self.changes >= self.period
    }

    pub fn current(&self) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        if self.avg_loss == 0.0 {
            return Some(100.0);
        }
        Some(100.0 - 100.0 / (1.0 + self.avg_gain / self.avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn warmup_needs_period_changes() {
        let mut rsi = Rsi::new(3);
        for c in [10.0, 11.0, 12.0] {
            rsi.update(c);
        }
        assert!(!rsi.is_ready());
        rsi.update(13.0);
        assert!(rsi.is_ready());
    }

    #[test]
    fn all_gains_is_100() {
        let mut rsi = Rsi::new(3);
        for c in [10.0, 11.0, 12.0, 13.0] {
            rsi.update(c);
        }
        assert_relative_eq!(rsi.current().unwrap(), 100.0);
    }

    #[test]
    fn seed_then_wilder_smoothing() {
        let mut rsi = Rsi::new(2);
        // changes: +2, -1 → seed avg_gain 1, avg_loss 0.5 → rsi 66.67
        for c in [10.0, 12.0, 11.0] {
            rsi.update(c);
        }
        assert_relative_eq!(rsi.current().unwrap(), 100.0 - 100.0 / 3.0, epsilon = 1e-9);
        // change -1: avg_gain 0.5, avg_loss 0.75 → rs 2/3 → rsi 40
        rsi.update(10.0);
        assert_relative_eq!(rsi.current().unwrap(), 40.0, epsilon = 1e-9);
    }
}
