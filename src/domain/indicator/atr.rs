//! Streaming average true range.
//!
//! TR of the first bar is high - low. The first ATR is the mean of the first n
//! TRs, then ATR = (prev × (n-1) + TR) / n.

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    count: usize,
    seed_sum: f64,
    value: Option<f64>,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "atr period must be positive");
        Self {
            period,
            prev_close: None,
            count: 0,
            seed_sum: 0.0,
            value: None,
        }
    }

    pub fn update(&mut self, bar: &OhlcvBar) {
        let tr = match self.prev_close {
            Some(prev) => bar.true_range(prev),
            None => bar.high - bar.low,
        };
        self.prev_close = Some(bar.close);
        self.count += 1;

        let n = self.period as f64;
        match self.value {
            Some(prev) => self.value = Some((prev * (n - 1.0) + tr) / n),
            None => {
                self.seed_sum += tr;
                if self.count == self.period {
                    self.value = Some(self.seed_sum / n);
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
    use crate::domain::symbol::Symbol;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bar(day: u32, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            symbol: Symbol::new("TEST"),
            end_time: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(16, 0, 0)
                .unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn seed_is_average_of_true_ranges() {
        let mut atr = Atr::new(3);
        atr.update(&bar(1, 12.0, 10.0, 11.0)); // TR 2
        atr.update(&bar(2, 13.0, 11.0, 12.0)); // TR 2
        assert!(!atr.is_ready());
        atr.update(&bar(3, 16.0, 12.0, 15.0)); // TR 4
        assert_relative_eq!(atr.current().unwrap(), 8.0 / 3.0);
    }

    #[test]
    fn wilder_smoothing_after_seed() {
        let mut atr = Atr::new(2);
        atr.update(&bar(1, 12.0, 10.0, 11.0)); // TR 2
        atr.update(&bar(2, 15.0, 11.0, 14.0)); // TR 4 → seed 3
        atr.update(&bar(3, 14.0, 13.0, 13.5)); // TR 1 → (3 + 1) / 2 = 2
        assert_relative_eq!(atr.current().unwrap(), 2.0);
    }

    #[test]
    fn gap_counts_in_true_range() {
        let mut atr = Atr::new(1);
        atr.update(&bar(1, 10.0, 9.0, 10.0));
        atr.update(&bar(2, 21.0, 20.0, 20.5)); // |21 - 10| = 11
        assert_relative_eq!(atr.current().unwrap(), 11.0);
    }
}
