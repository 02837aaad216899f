//! Bollinger oracle.
//!
//! The long side compares the total excess of price above the middle band with
//! the total deficit below it. The short side only counts how many samples sat
//! in the lower half. A long hint whose ratio falls short still yields
//! [`OracleScore::WeakLong`], never Short.

use super::OracleScore;
use crate::domain::direction::Direction;
use crate::domain::rolling_window::RollingWindow;
use crate::domain::snapshot::BollingerSnapshot;
use crate::domain::trend::TREND_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerParams {
    pub long_threshold: f64,
    pub short_threshold: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            long_threshold: 1.0,
            short_threshold: 1.0,
        }
    }
}

/// Excess above and deficit below the middle band, summed over the window.
/// The deficit starts at the epsilon floor.
pub fn excess_and_deficit(window: &RollingWindow<BollingerSnapshot>) -> (f64, f64) {
    window
        .iter()
        .fold((0.0, TREND_EPSILON), |(above, below), snap| {
            let offset = snap.offset();
            if offset >= 0.0 {
                (above + offset, below)
            } else {
                (above, below - offset)
            }
        })
}

pub fn score_bollinger(
    window: &RollingWindow<BollingerSnapshot>,
    hint: Option<Direction>,
    params: &BollingerParams,
) -> OracleScore {
    let Some(latest) = window.latest() else {
        return OracleScore::Neutral;
    };
    let band = latest.band();

    match hint {
        Some(Direction::Long) if band.is_upper_half() => {
            let (above, below) = excess_and_deficit(window);
            if above / below >= params.long_threshold {
                OracleScore::Long
            } else {
                OracleScore::WeakLong
            }
        }
        Some(Direction::Short) if band.is_lower_half() => {
            let lower = window.iter().filter(|s| s.band().is_lower_half()).count();
            if lower as f64 / window.len() as f64 >= params.short_threshold {
                OracleScore::Short
            } else {
                OracleScore::Neutral
            }
        }
        _ => OracleScore::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn window(prices: &[f64]) -> RollingWindow<BollingerSnapshot> {
        let mut w = RollingWindow::new("bollinger", prices.len().max(1));
        for &price in prices {
            w.push(BollingerSnapshot {
                lower: 90.0,
                middle: 100.0,
                upper: 110.0,
                price,
            });
        }
        w
    }

    #[test]
    fn all_above_middle_is_long() {
        let w = window(&[101.0, 103.0, 105.0]);
        let score = score_bollinger(&w, Some(Direction::Long), &BollingerParams::default());
        assert_eq!(score, OracleScore::Long);
    }

    #[test]
    fn weak_ratio_flips_to_weak_long_never_short() {
        // excess 5, deficit 10 + eps → ratio < 1
        let w = window(&[90.0, 105.0]);
        let score = score_bollinger(&w, Some(Direction::Long), &BollingerParams::default());
        assert_eq!(score, OracleScore::WeakLong);
    }

    #[test]
    fn lowering_threshold_restores_long() {
        let w = window(&[90.0, 105.0]);
        let params = BollingerParams {
            long_threshold: 0.4,
            ..BollingerParams::default()
        };
        assert_eq!(
            score_bollinger(&w, Some(Direction::Long), &params),
            OracleScore::Long
        );
    }

    #[test]
    fn long_hint_in_lower_half_is_neutral() {
        let w = window(&[105.0, 95.0]);
        let score = score_bollinger(&w, Some(Direction::Long), &BollingerParams::default());
        assert_eq!(score, OracleScore::Neutral);
    }

    #[test]
    fn short_requires_lower_half_fraction() {
        let all_lower = window(&[95.0, 92.0, 85.0]);
        assert_eq!(
            score_bollinger(&all_lower, Some(Direction::Short), &BollingerParams::default()),
            OracleScore::Short
        );

        let mixed = window(&[105.0, 92.0, 85.0]);
        assert_eq!(
            score_bollinger(&mixed, Some(Direction::Short), &BollingerParams::default()),
            OracleScore::Neutral
        );
        let lenient = BollingerParams {
            short_threshold: 0.6,
            ..BollingerParams::default()
        };
        assert_eq!(
            score_bollinger(&mixed, Some(Direction::Short), &lenient),
            OracleScore::Short
        );
    }

    #[test]
    fn no_hint_or_empty_is_neutral() {
        let w = window(&[105.0]);
        assert_eq!(
            score_bollinger(&w, None, &BollingerParams::default()),
            OracleScore::Neutral
        );
        let empty = RollingWindow::new("bollinger", 2);
        assert_eq!(
            score_bollinger(&empty, Some(Direction::Long), &BollingerParams::default()),
            OracleScore::Neutral
        );
    }

    #[test]
    fn excess_and_deficit_totals() {
        let w = window(&[104.0, 97.0, 102.0]);
        let (above, below) = excess_and_deficit(&w);
        assert_relative_eq!(above, 6.0);
        assert_relative_eq!(below, 3.0 + TREND_EPSILON);
    }
}
