//! MACD oracle.
//!
//! Long when every recent MACD value sits above the long threshold, Short when
//! every recent value sits below the short threshold. A zero-cross of the
//! histogram is always detected and reported; it only gates the score when
//! `require_cross` is set.

use super::OracleScore;
use crate::domain::direction::Direction;
use crate::domain::rolling_window::RollingWindow;
use crate::domain::snapshot::MacdSnapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdParams {
    pub cross_check_length: usize,
    pub macd_above_below_length: usize,
    pub long_macd_threshold: f64,
    pub short_macd_threshold: f64,
    pub require_cross: bool,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            cross_check_length: 35,
            macd_above_below_length: 28,
            long_macd_threshold: 0.25,
            short_macd_threshold: -0.25,
            require_cross: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdCross {
    Up,
    Down,
    NoCross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdReading {
    pub score: OracleScore,
    pub cross: MacdCross,
}

/// Zero-cross of the histogram within the `lookback` most recent snapshots.
pub fn detect_cross(window: &RollingWindow<MacdSnapshot>, lookback: usize) -> MacdCross {
    let Some(current) = window.latest().map(|s| s.histogram) else {
        return MacdCross::NoCross;
    };
    let mut recent = window.iter_recent_first().take(lookback).map(|s| s.histogram);
    if current >= 0.0 {
        if recent.any(|h| h < 0.0) {
            return MacdCross::Up;
        }
    } else if recent.any(|h| h > 0.0) {
        return MacdCross::Down;
    }
    MacdCross::NoCross
}

pub fn score_macd(
    window: &RollingWindow<MacdSnapshot>,
    hint: Option<Direction>,
    params: &MacdParams,
) -> MacdReading {
    let cross = detect_cross(window, params.cross_check_length);
    let neutral = MacdReading {
        score: OracleScore::Neutral,
        cross,
    };

    let Some(latest) = window.latest().map(|s| s.macd) else {
        return neutral;
    };
    let mut recent = window
        .iter_recent_first()
        .take(params.macd_above_below_length)
        .map(|s| s.macd);

    let score = match hint {
        Some(Direction::Long)
            if latest > params.long_macd_threshold
                && recent.all(|m| m > params.long_macd_threshold)
                && (!params.require_cross || cross == MacdCross::Up) =>
        {
            OracleScore::Long
        }
        Some(Direction::Short)
            if latest < params.short_macd_threshold
                && recent.all(|m| m < params.short_macd_threshold)
                && (!params.require_cross || cross == MacdCross::Down) =>
        {
            OracleScore::Short
        }
        _ => OracleScore::Neutral,
    };

    MacdReading { score, cross }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(values: &[(f64, f64)]) -> RollingWindow<MacdSnapshot> {
        let mut w = RollingWindow::new("macd", values.len().max(1));
        for &(macd, histogram) in values {
            w.push(MacdSnapshot {
                fast: 0.0,
                slow: 0.0,
                signal: macd - histogram,
                macd,
                histogram,
            });
        }
        w
    }

    #[test]
    fn all_above_threshold_is_long() {
        let w = window(&[(0.4, 0.1), (0.5, 0.1), (0.6, 0.2)]);
        let reading = score_macd(&w, Some(Direction::Long), &MacdParams::default());
        assert_eq!(reading.score, OracleScore::Long);
    }

    #[test]
    fn one_value_at_threshold_is_neutral() {
        let w = window(&[(0.4, 0.1), (0.25, 0.1), (0.6, 0.2)]);
        let reading = score_macd(&w, Some(Direction::Long), &MacdParams::default());
        assert_eq!(reading.score, OracleScore::Neutral);
    }

    #[test]
    fn only_recent_values_are_considered() {
        let w = window(&[(-3.0, -1.0), (0.4, 0.1), (0.6, 0.2)]);
        let params = MacdParams {
            macd_above_below_length: 2,
            ..MacdParams::default()
        };
        let reading = score_macd(&w, Some(Direction::Long), &params);
        assert_eq!(reading.score, OracleScore::Long);
    }

    #[test]
    fn all_below_short_threshold_is_short() {
        let w = window(&[(-0.4, -0.1), (-0.5, -0.1), (-0.6, -0.2)]);
        let reading = score_macd(&w, Some(Direction::Short), &MacdParams::default());
        assert_eq!(reading.score, OracleScore::Short);
    }

    #[test]
    fn no_hint_is_neutral() {
        let w = window(&[(0.4, 0.1), (0.5, 0.1)]);
        let reading = score_macd(&w, None, &MacdParams::default());
        assert_eq!(reading.score, OracleScore::Neutral);
    }

    #[test]
    fn empty_window_is_neutral() {
        let w = RollingWindow::new("macd", 3);
        let reading = score_macd(&w, Some(Direction::Long), &MacdParams::default());
        assert_eq!(reading.score, OracleScore::Neutral);
        assert_eq!(reading.cross, MacdCross::NoCross);
    }

    #[test]
    fn cross_detection() {
        let up = window(&[(0.3, -0.2), (0.4, 0.1)]);
        assert_eq!(detect_cross(&up, 35), MacdCross::Up);
        let down = window(&[(0.3, 0.2), (0.4, -0.1)]);
        assert_eq!(detect_cross(&down, 35), MacdCross::Down);
        let none = window(&[(0.3, 0.2), (0.4, 0.1)]);
        assert_eq!(detect_cross(&none, 35), MacdCross::NoCross);
    }

    #[test]
    fn cross_outside_lookback_ignored() {
        let w = window(&[(0.3, -0.2), (0.4, 0.1), (0.5, 0.3)]);
        assert_eq!(detect_cross(&w, 2), MacdCross::NoCross);
    }

    #[test]
    fn cross_is_advisory_unless_required() {
        let w = window(&[(0.4, 0.1), (0.5, 0.1), (0.6, 0.2)]);
        let advisory = score_macd(&w, Some(Direction::Long), &MacdParams::default());
        assert_eq!(advisory.score, OracleScore::Long);

        let gated = MacdParams {
            require_cross: true,
            ..MacdParams::default()
        };
        let reading = score_macd(&w, Some(Direction::Long), &gated);
        assert_eq!(reading.cross, MacdCross::NoCross);
        assert_eq!(reading.score, OracleScore::Neutral);
    }
}
