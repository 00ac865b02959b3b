//! Test fixtures for delivery-planner.
//!
//! Provides realistic test data including:
//! - Real Lagos delivery locations (approximate, from OpenStreetMap)
//! - A lookup-table geocoder standing in for Nominatim

pub mod lagos_locations;

pub use lagos_locations::*;
