//! Streaming average directional index.
//!
//! Per bar: +DM, -DM and TR against the previous bar. The first n of each are
//! summed, then Wilder-smoothed (s = s - s/n + x). DX = |+DI - -DI| / (+DI + -DI) × 100.
//! ADX is the mean of the first n DX values, then Wilder-averaged.
//! Ready after 2n bars.

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    prev: Option<(f64, f64, f64)>,
    transitions: usize,
    smooth_plus_dm: f64,
    smooth_minus_dm: f64,
    smooth_tr: f64,
    dx_count: usize,
    dx_sum: f64,
    value: Option<f64>,
}

fn dx(plus_dm: f64, minus_dm: f64, tr: f64) -> f64 {
    if tr <= 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * plus_dm / tr;
    let minus_di = 100.0 * minus_dm / tr;
    let sum = plus_di + minus_di;
    if sum <= 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / sum
    }
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "adx period must be positive");
        Self {
            period,
            prev: None,
            transitions: 0,
            smooth_plus_dm: 0.0,
            smooth_minus_dm: 0.0,
            smooth_tr: 0.0,
            dx_count: 0,
            dx_sum: 0.0,
            value: None,
        }
    }

    pub fn update(&mut self, bar: &OhlcvBar) {
        let Some((prev_high, prev_low, prev_close)) =
            self.prev.replace((bar.high, bar.low, bar.close))
        else {
            return;
        };

        let up_move = bar.high - prev_high;
        let down_move = prev_low - bar.low;
        let plus_dm = if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 };
        let minus_dm = if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 };
        let tr = bar.true_range(prev_close);

        let n = self.period as f64;
        self.transitions += 1;
        if self.transitions <= self.period {
            self.smooth_plus_dm += plus_dm;
            self.smooth_minus_dm += minus_dm;
            self.smooth_tr += tr;
            if self.transitions < self.period {
                return;
            }
        } else {
            self.smooth_plus_dm = self.smooth_plus_dm - self.smooth_plus_dm / n + plus_dm;
            self.smooth_minus_dm = self.smooth_minus_dm - self.smooth_minus_dm / n + minus_dm;
            self.smooth_tr = self.smooth_tr - self.smooth_tr / n + tr;
        }

        let dx = dx(self.smooth_plus_dm, self.smooth_minus_dm, self.smooth_tr);
        match self.value {
            Some(adx) => self.value = Some((adx * (n - 1.0) + dx) / n),
            None => {
                self.dx_sum += dx;
                self.dx_count += 1;
                if self.dx_count == self.period {
                    self.value = Some(self.dx_sum / n);
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
