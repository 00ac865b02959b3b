//! Geocoding against a real Nominatim instance.
//!
//! The container imports an OSM extract on first start, which takes several
//! minutes, so this test is ignored by default:
//!
//! ```text
//! cargo test --test nominatim_integration -- --ignored
//! ```
//!
//! Monaco is used because its extract is tiny.

use std::time::Duration;

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use delivery_planner::config::{BoundingBox, GeocoderConfig};
use delivery_planner::geocoder::NominatimGeocoder;
use delivery_planner::traits::Geocoder;

const MONACO_PBF: &str = "https://download.geofabrik.de/europe/monaco-latest.osm.pbf";

fn monaco_bounds() -> BoundingBox {
    BoundingBox {
        min_latitude: 43.70,
        max_latitude: 43.76,
        min_longitude: 7.38,
        max_longitude: 7.45,
    }
}

fn nominatim_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let image = GenericImage::new("mediagis/nominatim", "4.4")
        .with_exposed_port(8080.tcp())
        .with_wait_for(WaitFor::message_on_stdout("Nominatim is ready to accept requests"))
        .with_env_var("PBF_URL", MONACO_PBF)
        .with_container_name("nominatim-monaco")
        .with_startup_timeout(Duration::from_secs(900))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(8080.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

fn geocoder(base_url: &str, bounds: BoundingBox) -> NominatimGeocoder {
    let config = GeocoderConfig {
        base_url: base_url.to_string(),
        backoff_ms: 200,
        ..GeocoderConfig::default()
    };
    NominatimGeocoder::new(config, bounds).expect("build geocoder")
}

#[test]
#[ignore = "starts a Nominatim container and imports OSM data"]
fn resolves_address_inside_bounds() {
    let (container, base_url) = nominatim_container().expect("start Nominatim container");

    let geocoder = geocoder(&base_url, monaco_bounds());
    let found = geocoder.resolve("Place du Casino", "Monaco");

    let coordinates = found.expect("Place du Casino should resolve");
    assert!(monaco_bounds().contains(coordinates));

    drop(container);
}

#[test]
#[ignore = "starts a Nominatim container and imports OSM data"]
fn rejects_hits_outside_bounds() {
    let (container, base_url) = nominatim_container().expect("start Nominatim container");

    // Default bounds cover Lagos, so a Monaco hit is discarded.
    let geocoder = geocoder(&base_url, BoundingBox::default());
    assert_eq!(geocoder.resolve("Place du Casino", "Monaco"), None);

    drop(container);
}

#[test]
fn unreachable_service_is_unresolved() {
    // Nothing listens on port 9 locally; every attempt fails fast.
    let config = GeocoderConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
        backoff_ms: 10,
        ..GeocoderConfig::default()
    };
    let geocoder = NominatimGeocoder::new(config, BoundingBox::default()).expect("build geocoder");

    assert_eq!(geocoder.resolve("Ikeja City Mall", "Lagos, Nigeria"), None);
}
