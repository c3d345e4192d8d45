// error.rs - Error types for the engine and its configuration inputs

use thiserror::Error;

/// Rejected configuration input. The configuration that was active before
/// the rejected input stays in effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("rule string must have {expected} digits, found {found}")]
    RuleLength { expected: usize, found: usize },

    #[error("invalid rule digit {found:?} at index {index} (expected 0-3)")]
    RuleDigit { index: usize, found: char },

    #[error("legacy binary-pair rule strings are not supported")]
    LegacyRuleFormat,

    #[error("color string must have {expected} hex digits, found {found}")]
    ColorLength { expected: usize, found: usize },

    #[error("invalid hex color {0:?}")]
    ColorHex(String),

    #[error("unknown rule preset {0:?}")]
    UnknownPreset(String),

    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),

    #[error("unknown share key {0:?}")]
    ShareKey(String),

    #[error("malformed share string segment {0:?}")]
    ShareSegment(String),

    #[error("fill percent must be within 0..=100, got {0}")]
    FillPercent(f64),

    #[error("delay must be at least one tick")]
    ZeroDelay,
}

/// Fatal engine errors. These can only happen while setting up the
/// simulation, before the first step runs.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("grid of {width}x{height} cells overflows the address space")]
    SizeOverflow { width: usize, height: usize },

    #[error("failed to allocate {cells} cells")]
    Allocation {
        cells: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("surface is {found:?} but the grid is {expected:?}")]
    SurfaceSize {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read configuration file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file")]
    Json(#[from] serde_json::Error),
}
