//! ATR trailing stop.
//!
//! A long tracks its highest price since entry and exits once price falls more
//! than `multiplier × ATR` below it. A short tracks its lowest price and exits
//! once price rises the same distance above it.

use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionStop {
    /// Peak for longs, trough for shorts.
    pub peak_price: Option<f64>,
    pub hold_length: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopDecision {
    Hold,
    Liquidate { price: f64, peak: f64, band: f64 },
}

impl PositionStop {
    pub fn arm(&mut self, price: f64) {
        self.peak_price = Some(price);
        self.hold_length = Some(1);
    }

    pub fn clear(&mut self) {
        self.peak_price = None;
        self.hold_length = None;
    }

    pub fn is_armed(&self) -> bool {
        self.peak_price.is_some()
    }

    /// Apply one tick at `price` to a held `side`. Clears the stop when it fires.
    pub fn trail(
        &mut self,
        side: Direction,
        price: f64,
        atr: f64,
        multiplier: f64,
    ) -> StopDecision {
        let Some(mut peak) = self.peak_price else {
            return StopDecision::Hold;
        };
        if let Some(hold) = self.hold_length.as_mut() {
            *hold += 1;
        }

        let distance = multiplier * atr;
        let (band, triggered) = match side {
            Direction::Long => {
                peak = peak.max(price);
                let band = peak - distance;
                (band, price < band)
            }
            Direction::Short => {
                peak = peak.min(price);
                let band = peak + distance;
                (band, price > band)
            }
        };

        if triggered {
            self.clear();
            StopDecision::Liquidate { price, peak, band }
        } else {
            self.peak_price = Some(peak);
            StopDecision::Hold
        }
    }
}
