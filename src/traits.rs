//! Seams between the planner core and its external collaborators.

use crate::stop::Coordinates;

/// Resolves a free-text address to coordinates.
///
/// `region_bias` is appended to the query (for example "Lagos, Nigeria").
/// Implementations never fail loudly: `None` means the address could not be
/// resolved and the caller should drop the stop.
pub trait Geocoder {
    fn resolve(&self, address: &str, region_bias: &str) -> Option<Coordinates>;
}

impl<F> Geocoder for F
where
    F: Fn(&str, &str) -> Option<Coordinates>,
{
    fn resolve(&self, address: &str, region_bias: &str) -> Option<Coordinates> {
        self(address, region_bias)
    }
}
