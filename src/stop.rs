//! Delivery stops and their traffic tiers.

use serde::{Deserialize, Serialize};

use crate::district;

/// A latitude/longitude pair in degrees.
///
/// `(0.0, 0.0)` marks a location the geocoder could not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const UNRESOLVED: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True only when both components are non-zero.
    pub fn is_resolved(&self) -> bool {
        self.latitude != 0.0 && self.longitude != 0.0
    }
}

/// Coarse traffic-difficulty label for a location.
///
/// Ordering runs from the easiest tier to the hardest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficComplexity {
    Low,
    #[default]
    Moderate,
    High,
    VeryHigh,
}

impl TrafficComplexity {
    pub const ALL: [TrafficComplexity; 4] = [
        TrafficComplexity::Low,
        TrafficComplexity::Moderate,
        TrafficComplexity::High,
        TrafficComplexity::VeryHigh,
    ];

    /// Multiplier applied to geodesic distance.
    pub fn score(self) -> f64 {
        match self {
            TrafficComplexity::Low => 1.0,
            TrafficComplexity::Moderate => 1.3,
            TrafficComplexity::High => 1.7,
            TrafficComplexity::VeryHigh => 2.3,
        }
    }

    /// 1-based rank used when averaging leg complexity.
    pub fn ordinal(self) -> u8 {
        match self {
            TrafficComplexity::Low => 1,
            TrafficComplexity::Moderate => 2,
            TrafficComplexity::High => 3,
            TrafficComplexity::VeryHigh => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficComplexity::Low => "low",
            TrafficComplexity::Moderate => "moderate",
            TrafficComplexity::High => "high",
            TrafficComplexity::VeryHigh => "very_high",
        }
    }

    pub fn is_high(self) -> bool {
        self >= TrafficComplexity::High
    }
}

/// A delivery location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub address: String,
    pub coordinates: Coordinates,
    /// District label, empty when no known district matched.
    pub district: String,
    pub traffic_complexity: TrafficComplexity,
    /// Advisory for the driver, empty when there is none.
    pub delivery_notes: String,
}

impl Stop {
    /// Unresolved stop, already tagged with its district profile.
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        let address = address.into();
        let profile = district::classify(&address);
        Self {
            id: id.into(),
            address,
            coordinates: Coordinates::UNRESOLVED,
            district: profile.district.to_string(),
            traffic_complexity: profile.traffic_complexity,
            delivery_notes: profile.delivery_notes.to_string(),
        }
    }

    /// Stop with known coordinates.
    pub fn resolved(
        id: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self::new(id, address).with_coordinates(Coordinates::new(latitude, longitude))
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = coordinates;
        self
    }

    pub fn with_complexity(mut self, complexity: TrafficComplexity) -> Self {
        self.traffic_complexity = complexity;
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_resolved()
    }
}
