//! Static district profiles for Lagos delivery zones.
//!
//! Classification is a case-insensitive substring match over the table in
//! declaration order. The first fragment found in the address wins, so the
//! order of [`DISTRICT_PROFILES`] is part of the contract.

use crate::stop::TrafficComplexity;

/// Traffic profile assigned to an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistrictProfile {
    /// Display label, empty when nothing matched.
    pub district: &'static str,
    pub traffic_complexity: TrafficComplexity,
    pub delivery_notes: &'static str,
}

struct DistrictEntry {
    fragment: &'static str,
    profile: DistrictProfile,
}

const fn entry(
    fragment: &'static str,
    district: &'static str,
    traffic_complexity: TrafficComplexity,
    delivery_notes: &'static str,
) -> DistrictEntry {
    DistrictEntry {
        fragment,
        profile: DistrictProfile {
            district,
            traffic_complexity,
            delivery_notes,
        },
    }
}

/// Matched in order; the first fragment found wins. Labels are fixed
/// display names, so "vi" is reported as "VI" rather than title-cased "Vi".
const DISTRICT_PROFILES: &[DistrictEntry] = &[
    entry(
        "ikeja",
        "Ikeja",
        TrafficComplexity::High,
        "Business hub - expect moderate to heavy traffic",
    ),
    entry(
        "yaba",
        "Yaba",
        TrafficComplexity::High,
        "Tech district - congested during business hours",
    ),
    entry("lekki", "Lekki", TrafficComplexity::Moderate, "Planned area - good road network"),
    entry("vi", "VI", TrafficComplexity::VeryHigh, "Premium zone - traffic bottlenecks common"),
    entry("ajah", "Ajah", TrafficComplexity::Moderate, "Residential area - lighter traffic"),
    entry(
        "surulere",
        "Surulere",
        TrafficComplexity::High,
        "Dense commercial area - plan for delays",
    ),
    entry(
        "ikoyi",
        "Ikoyi",
        TrafficComplexity::High,
        "Elite area - security checkpoints may slow delivery",
    ),
    entry("apapa", "Apapa", TrafficComplexity::VeryHigh, "Port area - heavy truck traffic"),
];

/// Profile used when no district fragment matches.
pub const DEFAULT_PROFILE: DistrictProfile = DistrictProfile {
    district: "",
    traffic_complexity: TrafficComplexity::Moderate,
    delivery_notes: "",
};

pub fn classify(address: &str) -> DistrictProfile {
    let address = address.to_lowercase();
    DISTRICT_PROFILES
        .iter()
        .find(|entry| address.contains(entry.fragment))
        .map(|entry| entry.profile)
        .unwrap_or(DEFAULT_PROFILE)
}
