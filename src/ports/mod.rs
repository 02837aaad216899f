//! Port traits: the narrow interfaces the engine uses to reach the outside world.

pub mod config_port;
pub mod history_port;
pub mod portfolio_port;
