//! End-to-end route planning: addresses in, ordered route out.
//!
//! Geocoding failures are recovered here. An address that cannot be
//! resolved is logged, reported in [`RoutePlan::unresolved`] and left out of
//! the optimization; the plan only fails when fewer than two stops remain.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::PlannerConfig;
use crate::error::RouteError;
use crate::optimizer::{
    CancellationFlag, OptimizeOptions, OptimizedRoute, check_departure_hour, optimize,
};
use crate::stop::Stop;
use crate::traffic::TrafficOutlook;
use crate::traits::Geocoder;

/// Time assumed at each stop for unloading and handover.
const HOURS_PER_STOP: f64 = 0.5;

/// An input address that was dropped before optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedStop {
    pub id: String,
    pub address: String,
}

/// Reported duration of a planned route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteTiming {
    /// Effective distance at the average speed.
    pub base_travel_hours: f64,
    /// Base travel scaled by the departure-hour outlook.
    pub adjusted_travel_hours: f64,
    pub stop_hours: f64,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Every stop that entered the optimizer; `route.order` indexes into it.
    pub stops: Vec<Stop>,
    pub unresolved: Vec<UnresolvedStop>,
    pub route: OptimizedRoute,
    pub timing: RouteTiming,
    pub outlook: TrafficOutlook,
}

impl RoutePlan {
    /// Share of submitted addresses that were geocoded, in percent.
    pub fn geocoding_success_rate(&self) -> f64 {
        let submitted = self.stops.len() + self.unresolved.len();
        if submitted == 0 {
            return 0.0;
        }
        self.stops.len() as f64 / submitted as f64 * 100.0
    }

    /// Stops in visiting order.
    pub fn ordered_stops(&self) -> impl Iterator<Item = &Stop> + '_ {
        self.route.order.iter().map(|&i| &self.stops[i])
    }
}

pub struct RoutePlanner<G> {
    geocoder: G,
    config: PlannerConfig,
    cancellation: Option<CancellationFlag>,
}

impl<G: Geocoder> RoutePlanner<G> {
    pub fn new(geocoder: G, config: PlannerConfig) -> Self {
        Self {
            geocoder,
            config,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Parses a free-form address list and plans it.
    pub fn plan_text(&self, addresses: &str, departure_hour: u32) -> Result<RoutePlan, RouteError> {
        check_departure_hour(departure_hour)?;
        let addresses = parse_address_list(addresses)?;
        self.plan(&addresses, departure_hour)
    }

    /// Geocodes, classifies and orders `addresses`. Input is validated
    /// before any geocoding request.
    pub fn plan<S: AsRef<str>>(
        &self,
        addresses: &[S],
        departure_hour: u32,
    ) -> Result<RoutePlan, RouteError> {
        if addresses.is_empty() {
            return Err(RouteError::MalformedInput("no addresses provided".to_string()));
        }
        check_departure_hour(departure_hour)?;
        info!(count = addresses.len(), "planning delivery route");

        let mut stops = Vec::with_capacity(addresses.len());
        let mut unresolved = Vec::new();
        for (i, address) in addresses.iter().enumerate() {
            let stop = Stop::new(format!("stop-{}", i + 1), address.as_ref().trim());
            match self.geocoder.resolve(&stop.address, &self.config.region.bias) {
                Some(coordinates) if coordinates.is_resolved() => {
                    stops.push(stop.with_coordinates(coordinates));
                }
                _ => {
                    warn!(id = %stop.id, address = %stop.address, "dropping unresolved stop");
                    unresolved.push(UnresolvedStop {
                        id: stop.id,
                        address: stop.address,
                    });
                }
            }
        }

        self.finish(stops, unresolved, departure_hour)
    }

    /// Orders stops the caller already geocoded. Unresolved entries are
    /// reported rather than optimized.
    pub fn plan_stops(
        &self,
        stops: Vec<Stop>,
        departure_hour: u32,
    ) -> Result<RoutePlan, RouteError> {
        if stops.is_empty() {
            return Err(RouteError::MalformedInput("no stops provided".to_string()));
        }
        check_departure_hour(departure_hour)?;

        let (resolved, dropped): (Vec<Stop>, Vec<Stop>) =
            stops.into_iter().partition(Stop::is_resolved);
        let unresolved = dropped
            .into_iter()
            .map(|stop| UnresolvedStop {
                id: stop.id,
                address: stop.address,
            })
            .collect();

        self.finish(resolved, unresolved, departure_hour)
    }

    fn finish(
        &self,
        stops: Vec<Stop>,
        unresolved: Vec<UnresolvedStop>,
        departure_hour: u32,
    ) -> Result<RoutePlan, RouteError> {
        let options = OptimizeOptions {
            traffic: self.config.traffic.clone(),
            cancellation: self.cancellation.clone(),
            ..OptimizeOptions::default()
        };
        let route = optimize(&stops, departure_hour, &options)?;

        let outlook = TrafficOutlook::for_hour(departure_hour);
        let timing = route_timing(
            route.total_distance_km,
            stops.len(),
            self.config.traffic.average_speed_kmh,
            &outlook,
        );

        info!(
            stops = stops.len(),
            unresolved = unresolved.len(),
            total_km = route.total_distance_km,
            total_hours = timing.total_hours,
            "route planned"
        );

        Ok(RoutePlan {
            stops,
            unresolved,
            route,
            timing,
            outlook,
        })
    }
}

pub fn route_timing(
    distance_km: f64,
    stops: usize,
    average_speed_kmh: f64,
    outlook: &TrafficOutlook,
) -> RouteTiming {
    let base_travel_hours = distance_km / average_speed_kmh;
    let adjusted_travel_hours = base_travel_hours * outlook.multiplier;
    let stop_hours = stops as f64 * HOURS_PER_STOP;

    RouteTiming {
        base_travel_hours,
        adjusted_travel_hours,
        stop_hours,
        total_hours: adjusted_travel_hours + stop_hours,
    }
}

/// Splits caller input into addresses.
///
/// Accepts a JSON array of strings, a bracketed list of double-quoted
/// strings, or a comma-separated list. Blank entries are dropped.
pub fn parse_address_list(raw: &str) -> Result<Vec<String>, RouteError> {
    let raw = raw.trim();

    let addresses: Vec<String> = if raw.starts_with('[') && raw.ends_with(']') {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(list) => list,
            Err(_) => quoted_segments(raw),
        }
    } else {
        raw.split(',').map(str::to_string).collect()
    };

    let addresses: Vec<String> = addresses
        .into_iter()
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty())
        .collect();

    if addresses.is_empty() {
        return Err(RouteError::MalformedInput("no valid addresses provided".to_string()));
    }
    Ok(addresses)
}

fn quoted_segments(raw: &str) -> Vec<String> {
    raw.split('"')
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect()
}
