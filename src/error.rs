//! Error types for the delivery planner.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to callers of the optimizer and planner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Address list empty or unparsable, or an out-of-range departure hour.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Fewer than two stops survived geocoding.
    #[error("need at least 2 resolved stops for route optimization, got {usable}")]
    InsufficientStops { usable: usize },
    #[error("route optimization was cancelled")]
    Cancelled,
}

/// Failures inside a single geocoding attempt.
///
/// These never leave the geocoder; an address that keeps failing is
/// reported as unresolved instead.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder returned an invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}
