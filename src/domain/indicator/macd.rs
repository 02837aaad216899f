//! Streaming MACD.
//!
//! MACD line = EMA(fast) - EMA(slow), signal = EMA(signal) of the MACD line,
//! histogram = MACD - signal. Ready once the signal EMA is seeded.

use super::ema::Ema;
use crate::domain::snapshot::MacdSnapshot;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    line: Option<f64>,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
            line: None,
        }
    }

    pub fn update(&mut self, close: f64) {
        self.fast.update(close);
        self.slow.update(close);
        if let (Some(fast), Some(slow)) = (self.fast.current(), self.slow.current()) {
            let line = fast - slow;
            self.line = Some(line);
            self.signal.update(line);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.signal.is_ready()
    }

    pub fn current(&self) -> Option<MacdSnapshot> {
        let fast = self.fast.current()?;
        let slow = self.slow.current()?;
        let macd = self.line?;
        let signal = self.signal.current()?;
        Some(MacdSnapshot {
            fast,
            slow,
            signal,
            macd,
            histogram: macd - signal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn warmup_is_slow_plus_signal_minus_two() {
        let mut macd = Macd::new(3, 5, 2);
        for i in 0..5 {
            macd.update(100.0 + i as f64);
            assert!(!macd.is_ready(), "ready too early at {i}");
        }
        macd.update(105.0);
        assert!(macd.is_ready());
    }

    #[test]
    fn flat_prices_give_zero_macd() {
        let mut macd = Macd::new(12, 26, 9);
        for _ in 0..60 {
            macd.update(50.0);
        }
        let snap = macd.current().unwrap();
        assert_relative_eq!(snap.macd, 0.0, epsilon = 1e-9);
        assert_relative_eq!(snap.histogram, 0.0, epsilon = 1e-9);
        assert_relative_eq!(snap.fast, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn rising_prices_give_positive_macd() {
        let mut macd = Macd::new(12, 26, 9);
        for i in 0..80 {
            macd.update(100.0 + i as f64);
        }
        let snap = macd.current().unwrap();
        assert!(snap.macd > 0.0);
        assert_relative_eq!(snap.histogram, snap.macd - snap.signal);
    }
}
