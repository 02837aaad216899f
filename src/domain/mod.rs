//! Domain layer: pure signal-fusion and position-lifecycle logic.
//!
//! Nothing here performs I/O; the outside world is reached through the traits
//! in [`crate::ports`].

pub mod aggregator;
pub mod config;
pub mod config_validation;
pub mod direction;
pub mod engine;
pub mod entry_watch;
pub mod error;
pub mod indicator;
pub mod insight;
pub mod ohlcv;
pub mod oracle;
pub mod position_stop;
pub mod rolling_window;
pub mod snapshot;
pub mod symbol;
pub mod symbol_state;
pub mod trend;
