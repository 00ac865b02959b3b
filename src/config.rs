//! Planner configuration.
//!
//! Every collaborator receives its settings explicitly; nothing is read from
//! process-wide state. Files are TOML and every section is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsConfig;
use crate::distance::TrafficModel;
use crate::error::ConfigError;
use crate::stop::Coordinates;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub region: RegionConfig,
    pub geocoder: GeocoderConfig,
    pub traffic: TrafficModel,
    pub analytics: AnalyticsConfig,
}

/// Target region for geocoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Appended to every geocoding query.
    pub bias: String,
    /// Geocoder hits outside this rectangle are discarded.
    pub bounds: BoundingBox,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            bias: "Lagos, Nigeria".to_string(),
            bounds: BoundingBox::default(),
        }
    }
}

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        // Greater Lagos
        Self {
            min_latitude: 6.0,
            max_latitude: 7.0,
            min_longitude: 3.0,
            max_longitude: 4.5,
        }
    }
}

impl BoundingBox {
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Total attempts per address, including the first.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub backoff_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "delivery_optimizer".to_string(),
            timeout_secs: 8,
            max_attempts: 2,
            backoff_ms: 1000,
        }
    }
}

impl PlannerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = &self.region.bounds;
        if bounds.min_latitude > bounds.max_latitude
            || bounds.min_longitude > bounds.max_longitude
        {
            return Err(ConfigError::Validation(
                "region.bounds minimum exceeds maximum".to_string(),
            ));
        }
        if self.geocoder.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "geocoder.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.traffic.average_speed_kmh.is_nan() || self.traffic.average_speed_kmh <= 0.0 {
            return Err(ConfigError::Validation(
                "traffic.average_speed_kmh must be positive".to_string(),
            ));
        }
        for window in [&self.traffic.morning_rush, &self.traffic.evening_rush] {
            if !(0.0..24.0).contains(&window.start)
                || !(0.0..=24.0).contains(&window.end)
                || window.start > window.end
            {
                return Err(ConfigError::Validation(format!(
                    "rush window {}-{} must lie within 0-24",
                    window.start, window.end
                )));
            }
        }
        Ok(())
    }
}
