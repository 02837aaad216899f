//! Streaming Bollinger Bands.
//!
//! Middle = SMA(n), Upper/Lower = Middle ± k × population stddev (divide by N).
//! Ready once n closes have been seen.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    k: f64,
    closes: VecDeque<f64>,
}

impl Bollinger {
    pub fn new(period: usize, k: f64) -> Self {
        assert!(period > 0, "bollinger period must be positive");
        Self {
            period,
            k,
            closes: VecDeque::with_capacity(period),
        }
    }

    pub fn update(&mut self, close: f64) {
        if self.closes.len() == self.period {
            self.closes.pop_front();
        }
        self.closes.push_back(close);
    }

    pub fn is_ready(&self) -> bool {
        self.closes.len() == self.period
    }

    pub fn current(&self) -> Option<Bands> {
        if !self.is_ready() {
            return None;
        }
        let n = self.period as f64;
        let middle = self.closes.iter().sum::<f64>() / n;
        let variance = self
            .closes
            .iter()
            .map(|c| {
                let diff = c - middle;
                diff * diff
            })
            .sum::<f64>()
            / n;
        let width = self.k * variance.sqrt();
        Some(Bands {
            lower: middle - width,
            middle,
            upper: middle + width,
        })
    }
}
