//! Domain error types.
//!
//! Only conditions that must stop the program live here. Per-symbol conditions
//! (missing bars, indicators still warming up) are reported as
//! [`NoBuyReason`](crate::domain::aggregator::NoBuyReason)s instead.

/// Top-level error type for oraclefuse.
#[derive(Debug, thiserror::Error)]
pub enum OracleFuseError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OracleFuseError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        OracleFuseError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&OracleFuseError> for std::process::ExitCode {
    fn from(err: &OracleFuseError) -> Self {
        let code: u8 = match err {
            OracleFuseError::Io(_) => 1,
            OracleFuseError::ConfigParse { .. } | OracleFuseError::ConfigInvalid { .. } => 2,
            OracleFuseError::Data { .. } => 3,
            OracleFuseError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
