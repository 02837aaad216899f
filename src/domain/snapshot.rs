//! Immutable indicator snapshots stored in rolling windows.

/// Bollinger bands together with the price they were sampled against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerSnapshot {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
    pub price: f64,
}

/// Where a price sits relative to the bands. Touching a band counts as reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPosition {
    AboveUpper,
    MiddleUpper,
    LowerMiddle,
    BelowLower,
}

impl BandPosition {
    pub fn is_upper_half(self) -> bool {
        matches!(self, BandPosition::AboveUpper | BandPosition::MiddleUpper)
    }

    pub fn is_lower_half(self) -> bool {
        !self.is_upper_half()
    }
}

impl BollingerSnapshot {
    pub fn band(&self) -> BandPosition {
        if self.price >= self.upper {
            BandPosition::AboveUpper
        } else if self.price >= self.middle {
            BandPosition::MiddleUpper
        } else if self.price >= self.lower {
            BandPosition::LowerMiddle
        } else {
            BandPosition::BelowLower
        }
    }

    /// Signed distance of the price from the middle band.
    pub fn offset(&self) -> f64 {
        self.price - self.middle
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdSnapshot {
    pub fast: f64,
    pub slow: f64,
    pub signal: f64,
    pub macd: f64,
    pub histogram: f64,
}
