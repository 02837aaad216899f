//! Streaming on-balance volume.
//!
//! OBV starts at the first bar's volume, then adds the volume of up-closes and
//! subtracts the volume of down-closes. Ready from the first bar.

#[derive(Debug, Clone, Default)]
pub struct Obv {
    prev_close: Option<f64>,
    value: Option<f64>,
}

impl Obv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, close: f64, volume: i64) {
        let volume = volume as f64;
        self.value = Some(match (self.value, self.prev_close) {
            (Some(obv), Some(prev)) if close > prev => obv + volume,
            (Some(obv), Some(prev)) if close < prev => obv - volume,
            (Some(obv), _) => obv,
            (None, _) => volume,
        });
        self.prev_close = Some(close);
    }

    pub fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    pub fn current(&self) -> Option<f64> {
        self.value
    }
}
