//! Normalized trend strength of a numeric series.
//!
//! slope = least-squares slope over the last `order` points,
//! reference = max(|mean of the last `k_order` points|, 1e-4),
//! trend = slope / reference.

pub const TREND_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendEstimator {
    pub order: usize,
    pub k_order: usize,
}

impl TrendEstimator {
    pub fn new(order: usize, k_order: usize) -> Self {
        Self { order, k_order }
    }

    /// Signed, dimensionless trend of `values` (oldest first). Neutral (0.0) when
    /// there is not enough data or the arithmetic degenerates.
    pub fn estimate(&self, values: &[f64]) -> f64 {
        if self.order < 2 || values.len() < self.order {
            return 0.0;
        }
        let tail = &values[values.len() - self.order..];
        if tail.iter().any(|v| !v.is_finite()) {
            return 0.0;
        }

        let n = tail.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = tail.iter().sum::<f64>() / n;
        let mut num = 0.0;
        let mut den = 0.0;
        for (i, &y) in tail.iter().enumerate() {
            let dx = i as f64 - mean_x;
            num += dx * (y - mean_y);
            den += dx * dx;
        }
        let slope = num / den;

        let k = self.k_order.clamp(1, self.order);
        let recent = &tail[tail.len() - k..];
        let reference = (recent.iter().sum::<f64>() / k as f64)
            .abs()
            .max(TREND_EPSILON);

        let trend = slope / reference;
        if trend.is_finite() { trend } else { 0.0 }
    }
}
