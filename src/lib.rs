//! delivery-planner core
//!
//! Sequences multi-stop urban deliveries: geocoded stops and a traffic
//! model in, an ordered route with per-leg insights out.

pub mod analytics;
pub mod config;
pub mod distance;
pub mod district;
pub mod error;
pub mod geocoder;
pub mod haversine;
pub mod matrix;
pub mod optimizer;
pub mod planner;
pub mod stop;
pub mod traffic;
pub mod traits;

pub use error::RouteError;
pub use optimizer::{OptimizeOptions, OptimizedRoute, RouteInsight, optimize};
pub use planner::{RoutePlan, RoutePlanner};
pub use stop::{Coordinates, Stop, TrafficComplexity};
