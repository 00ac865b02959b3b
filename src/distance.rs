//! Traffic-adjusted effective distance between stops.
//!
//! Effective distance is the great-circle distance scaled by the mean
//! complexity score of the two endpoints. It is a routing cost, not a
//! physical length. Rush-hour penalties are layered on top only while a
//! tour is being constructed.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;
use crate::stop::{Stop, TrafficComplexity};

/// Inclusive hour range, e.g. 7.0..=10.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RushWindow {
    pub start: f64,
    pub end: f64,
}

impl RushWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: f64) -> bool {
        self.start <= hour && hour <= self.end
    }
}

/// Travel-time multipliers applied inside rush windows, keyed on the
/// hardest endpoint of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RushPenalties {
    pub very_high: f64,
    pub high: f64,
    pub other: f64,
}

impl Default for RushPenalties {
    fn default() -> Self {
        Self {
            very_high: 2.5,
            high: 1.8,
            other: 1.4,
        }
    }
}

/// Keyword rule that attaches an advisory note to a leg.
///
/// With `from` set, the rule fires when the origin mentions `from` and the
/// destination mentions `to`. Without it, the rule fires when either
/// endpoint mentions `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAdvisory {
    #[serde(default)]
    pub from: Option<String>,
    pub to: String,
    pub note: String,
}

impl RouteAdvisory {
    pub fn between(from: &str, to: &str, note: &str) -> Self {
        Self {
            from: Some(from.to_string()),
            to: to.to_string(),
            note: note.to_string(),
        }
    }

    pub fn corridor(keyword: &str, note: &str) -> Self {
        Self {
            from: None,
            to: keyword.to_string(),
            note: note.to_string(),
        }
    }

    fn applies(&self, origin: &str, destination: &str) -> bool {
        match &self.from {
            Some(from) => origin.contains(from.as_str()) && destination.contains(self.to.as_str()),
            None => origin.contains(self.to.as_str()) || destination.contains(self.to.as_str()),
        }
    }
}

fn default_advisories() -> Vec<RouteAdvisory> {
    vec![
        RouteAdvisory::between(
            "lekki",
            "mainland",
            "Bridge crossing required - factor in toll time",
        ),
        RouteAdvisory::corridor(
            "third mainland",
            "Major bottleneck during rush - add 30-45min buffer",
        ),
        RouteAdvisory::corridor("lekki-epe", "Toll delays possible - keep toll fare handy"),
        RouteAdvisory::corridor("eko bridge", "Alternative to Third Mainland when congested"),
        RouteAdvisory::corridor("western avenue", "Heavy traffic 7-10am, use Ikorodu Road instead"),
    ]
}

/// Per-leg annotations produced alongside the effective distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegInfo {
    pub base_distance_km: f64,
    pub complexity_factor: f64,
    pub estimated_time_hours: f64,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficModel {
    /// Assumed average urban driving speed.
    pub average_speed_kmh: f64,
    pub morning_rush: RushWindow,
    pub evening_rush: RushWindow,
    pub rush_penalties: RushPenalties,
    pub advisories: Vec<RouteAdvisory>,
}

impl Default for TrafficModel {
    fn default() -> Self {
        Self {
            average_speed_kmh: 25.0,
            morning_rush: RushWindow::new(7.0, 10.0),
            evening_rush: RushWindow::new(16.0, 19.0),
            rush_penalties: RushPenalties::default(),
            advisories: default_advisories(),
        }
    }
}

impl TrafficModel {
    /// Effective distance from `a` to `b` plus leg annotations.
    pub fn effective_distance(&self, a: &Stop, b: &Stop) -> (f64, LegInfo) {
        let base_distance_km = haversine_km(a.coordinates, b.coordinates);
        let complexity_factor = complexity_factor(a.traffic_complexity, b.traffic_complexity);

        let info = LegInfo {
            base_distance_km,
            complexity_factor,
            estimated_time_hours: base_distance_km / self.average_speed_kmh * complexity_factor,
            notes: self.leg_notes(a, b),
        };

        (base_distance_km * complexity_factor, info)
    }

    /// Whether `hour` (any real value, taken modulo 24) is in a rush window.
    pub fn is_rush_hour(&self, hour: f64) -> bool {
        let hour = hour.rem_euclid(24.0);
        self.morning_rush.contains(hour) || self.evening_rush.contains(hour)
    }

    /// Construction-time multiplier for leaving `a` towards `b` at `hour`.
    pub fn time_penalty(&self, a: &Stop, b: &Stop, hour: f64) -> f64 {
        if !self.is_rush_hour(hour) {
            return 1.0;
        }

        match a.traffic_complexity.max(b.traffic_complexity) {
            TrafficComplexity::VeryHigh => self.rush_penalties.very_high,
            TrafficComplexity::High => self.rush_penalties.high,
            _ => self.rush_penalties.other,
        }
    }

    fn leg_notes(&self, a: &Stop, b: &Stop) -> Vec<String> {
        if self.advisories.is_empty() {
            return Vec::new();
        }

        let origin = location_text(a);
        let destination = location_text(b);
        self.advisories
            .iter()
            .filter(|advisory| advisory.applies(&origin, &destination))
            .map(|advisory| advisory.note.clone())
            .collect()
    }
}

/// Mean of the two endpoint complexity scores.
pub fn complexity_factor(a: TrafficComplexity, b: TrafficComplexity) -> f64 {
    (a.score() + b.score()) / 2.0
}

fn location_text(stop: &Stop) -> String {
    format!("{} {}", stop.address, stop.district).to_lowercase()
}
