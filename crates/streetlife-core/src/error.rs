//! Errors
//!
//! Hard failures only. Business-rule rejections live beside the engine
//! that produces them and carry their user-facing reason as `Display`.

use thiserror::Error;

/// Invalid clock construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeError {
    #[error("hour must be in [0, 24), got {0}")]
    InvalidHour(f32),
    #[error("day must be at least 1, got {0}")]
    InvalidDay(u32),
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
