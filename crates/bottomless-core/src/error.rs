//! Pagination controller error types

use thiserror::Error;

/// Pagination error type
#[derive(Debug, Error)]
pub enum PagerError {
    /// Page fetch failed (network/HTTP). Recovered locally: the in-flight
    /// state is released and the next qualifying poll may retry.
    #[error("transport error: {0}")]
    Transport(String),

    /// Missing or invalid configuration (request URL, result selector,
    /// intervals). Fatal to the attempt it surfaced on, never to the
    /// poll loop.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Viewport geometry query failed. Treated as "not near bottom" for
    /// the cycle it occurred on.
    #[error("measurement error: {0}")]
    Measurement(String),

    /// Request URL failed to parse
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl PagerError {
    /// Transport failure from any displayable cause
    pub fn transport(msg: impl std::fmt::Display) -> Self {
        Self::Transport(msg.to_string())
    }

    /// Configuration failure from any displayable cause
    pub fn configuration(msg: impl std::fmt::Display) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Measurement failure from any displayable cause
    pub fn measurement(msg: impl std::fmt::Display) -> Self {
        Self::Measurement(msg.to_string())
    }
}
