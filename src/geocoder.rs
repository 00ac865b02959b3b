//! Nominatim HTTP adapter for address geocoding.

use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{BoundingBox, GeocoderConfig};
use crate::error::GeocodeError;
use crate::stop::Coordinates;
use crate::traits::Geocoder;

/// Addresses shorter than this (after trimming) are never sent out.
const MIN_ADDRESS_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    config: GeocoderConfig,
    bounds: BoundingBox,
    client: reqwest::blocking::Client,
}

impl NominatimGeocoder {
    pub fn new(config: GeocoderConfig, bounds: BoundingBox) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            bounds,
            client,
        })
    }

    /// One round trip. `Ok(None)` means the service answered but had no
    /// usable hit inside the bounding box.
    fn lookup(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));

        let hits = self
            .client
            .get(url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>())?;

        match hits.first() {
            Some(place) => {
                let coordinates = place.coordinates()?;
                Ok(self.bounds.contains(coordinates).then_some(coordinates))
            }
            None => Ok(None),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn resolve(&self, address: &str, region_bias: &str) -> Option<Coordinates> {
        let address = address.trim();
        if address.len() < MIN_ADDRESS_LEN {
            warn!(address = %address, "address too short to geocode");
            return None;
        }

        let query = format!("{}, {}", address, region_bias);
        let backoff = Duration::from_millis(self.config.backoff_ms);
        let resolved = with_retries(self.config.max_attempts, backoff, || self.lookup(&query));

        match resolved {
            Some(coordinates) => {
                info!(
                    address = %address,
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    "geocoded address"
                );
                Some(coordinates)
            }
            None => {
                warn!(address = %address, "failed to geocode address");
                None
            }
        }
    }
}

/// Runs `attempt` up to `max_attempts` times, sleeping `backoff` between
/// failed attempts. A successful attempt ends the loop even when it found
/// nothing.
pub(crate) fn with_retries<F>(
    max_attempts: u32,
    backoff: Duration,
    mut attempt: F,
) -> Option<Coordinates>
where
    F: FnMut() -> Result<Option<Coordinates>, GeocodeError>,
{
    for n in 1..=max_attempts {
        match attempt() {
            Ok(found) => return found,
            Err(err) => {
                warn!(attempt = n, error = %err, "geocoding attempt failed");
                if n < max_attempts {
                    thread::sleep(backoff);
                }
            }
        }
    }
    None
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn coordinates(&self) -> Result<Coordinates, GeocodeError> {
        let latitude = self
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidCoordinate(self.lat.clone()))?;
        let longitude = self
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidCoordinate(self.lon.clone()))?;
        Ok(Coordinates::new(latitude, longitude))
    }
}
