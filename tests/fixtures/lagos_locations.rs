//! Lagos delivery locations for realistic test fixtures.
//!
//! Coordinates are approximate OpenStreetMap positions. Every address
//! mentions its district so the stops pick up the right traffic tier.

use delivery_planner::stop::{Coordinates, Stop};

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(address: &'static str, lat: f64, lng: f64) -> Self {
        Self { address, lat, lng }
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    pub fn stop(&self, id: &str) -> Stop {
        Stop::resolved(id, self.address, self.lat, self.lng)
    }
}

// ============================================================================
// Mainland
// ============================================================================

pub const MAINLAND: &[Location] = &[
    Location::new("Ikeja City Mall, Obafemi Awolowo Way, Ikeja", 6.6018, 3.3515),
    Location::new("Computer Village, Otigba Street, Ikeja", 6.5944, 3.3425),
    Location::new("Yaba Market, Tejuosho, Yaba", 6.5095, 3.3711),
    Location::new("National Stadium, Surulere", 6.4986, 3.3650),
    Location::new("Apapa Wharf, Apapa", 6.4489, 3.3590),
];

// ============================================================================
// Island
// ============================================================================

pub const ISLAND: &[Location] = &[
    Location::new("Tafawa Balewa Square, Ikoyi", 6.4474, 3.4030),
    Location::new("Bar Beach, Victoria Island", 6.4281, 3.4219),
    Location::new("Admiralty Way, Lekki Phase 1", 6.4474, 3.4723),
    Location::new("Lekki Conservation Centre, Lekki", 6.4413, 3.5357),
    Location::new("Ajah Market, Ajah", 6.4698, 3.5852),
];

/// All fixtures, mainland first.
pub fn all_locations() -> Vec<Location> {
    MAINLAND.iter().chain(ISLAND.iter()).copied().collect()
}

/// Resolved stops for every fixture location, ids `s0`, `s1`, ...
pub fn all_stops() -> Vec<Stop> {
    all_locations()
        .iter()
        .enumerate()
        .map(|(i, location)| location.stop(&format!("s{}", i)))
        .collect()
}

/// Geocoder that knows only the fixture addresses.
pub fn fixture_geocoder(address: &str, _region_bias: &str) -> Option<Coordinates> {
    all_locations()
        .into_iter()
        .find(|location| location.address == address)
        .map(|location| location.coords())
}
