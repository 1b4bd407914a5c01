//! Error types for boundary loading and configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a boundary tier.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the GeoJSON file
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Payload is not valid GeoJSON
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: simd_json::Error,
    },

    /// Payload parsed but is not a feature collection
    #[error("{} is not a GeoJSON FeatureCollection", .path.display())]
    NotFeatureCollection { path: PathBuf },

    /// Background task ended without reporting a result
    #[error("Boundary load task for {tier} ended without a result")]
    TaskDropped { tier: String },
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Config file is not valid JSON for the expected schema
    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Invalid tier table entry
    #[error("Invalid tier '{tier}': {reason}")]
    InvalidTier { tier: String, reason: String },

    /// Invalid scalar setting
    #[error("Invalid configuration: {key} = {value} - {reason}")]
    InvalidValue {
        key: &'static str,
        value: f64,
        reason: &'static str,
    },
}
