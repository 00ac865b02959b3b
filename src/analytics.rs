//! Cost, efficiency and sustainability metrics for a finished route.
//!
//! Everything here is a read-only projection over optimizer output; no
//! geocoding or routing happens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::optimizer::RouteInsight;
use crate::planner::RoutePlan;
use crate::stop::TrafficComplexity;

/// Fleet and market constants used by the projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub ideal_speed_kmh: f64,
    pub ideal_hours_per_stop: f64,
    pub ideal_km_per_stop: f64,
    pub fuel_km_per_liter: f64,
    pub fuel_price_per_liter: f64,
    /// Local currency units per US dollar.
    pub exchange_rate_usd: f64,
    pub co2_kg_per_liter: f64,
    /// Yearly CO2 absorption of one tree.
    pub tree_kg_co2_per_year: f64,
    pub driver_hourly_rate: f64,
    pub wear_cost_per_km: f64,
    pub toll_cost: f64,
    pub long_leg_hours: f64,
    pub long_leg_km: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            ideal_speed_kmh: 30.0,
            ideal_hours_per_stop: 0.5,
            ideal_km_per_stop: 5.0,
            fuel_km_per_liter: 8.5,
            fuel_price_per_liter: 750.0,
            exchange_rate_usd: 1500.0,
            co2_kg_per_liter: 2.31,
            tree_kg_co2_per_year: 21.8,
            driver_hourly_rate: 2500.0,
            wear_cost_per_km: 50.0,
            toll_cost: 200.0,
            long_leg_hours: 1.0,
            long_leg_km: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FuelRating {
    Excellent,
    Good,
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelEstimate {
    pub liters: f64,
    pub cost: f64,
    pub cost_usd: f64,
    pub rating: FuelRating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarbonFootprint {
    pub co2_kg: f64,
    pub trees_daily_equivalent: f64,
    /// 'A', 'B' or 'C'.
    pub grade: char,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub fuel_cost: f64,
    pub driver_cost: f64,
    pub vehicle_wear: f64,
    pub toll_costs: f64,
    pub total_cost: f64,
    pub cost_per_delivery: f64,
    pub cost_per_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplexityRating {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityAnalysis {
    pub average_complexity: f64,
    pub rating: ComplexityRating,
    pub high_complexity_legs: usize,
    /// Leg count per tier; every tier is present.
    pub distribution: BTreeMap<TrafficComplexity, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SustainabilityRating {
    Excellent,
    Good,
    Moderate,
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAnalytics {
    pub efficiency_score: f64,
    pub fuel: FuelEstimate,
    pub carbon: CarbonFootprint,
    pub cost: CostBreakdown,
    pub complexity: ComplexityAnalysis,
    pub opportunities: Vec<String>,
    pub performance_grade: &'static str,
    pub sustainability: SustainabilityRating,
}

/// Analytics for a planned route, using its reported timing.
pub fn analyze(plan: &RoutePlan, config: &AnalyticsConfig) -> RouteAnalytics {
    analyze_route(
        plan.route.total_distance_km,
        plan.timing.total_hours,
        plan.route.order.len(),
        &plan.route.insights,
        config,
    )
}

pub fn analyze_route(
    distance_km: f64,
    total_hours: f64,
    stops: usize,
    insights: &[RouteInsight],
    config: &AnalyticsConfig,
) -> RouteAnalytics {
    let efficiency_score = efficiency_score(distance_km, total_hours, stops, config);
    let fuel = fuel_estimate(distance_km, config);
    let carbon = carbon_footprint(&fuel, config);
    let cost = cost_breakdown(distance_km, total_hours, stops, config);
    let sustainability = sustainability_rating(carbon.co2_kg);

    RouteAnalytics {
        efficiency_score,
        fuel,
        carbon,
        cost,
        complexity: complexity_analysis(insights),
        opportunities: optimization_opportunities(insights, config),
        performance_grade: performance_grade(efficiency_score),
        sustainability,
    }
}

/// Mean of speed efficiency and distance-per-stop efficiency, each in
/// [0, 100]. Zero when distance, time or stop count is zero.
pub fn efficiency_score(
    distance_km: f64,
    total_hours: f64,
    stops: usize,
    config: &AnalyticsConfig,
) -> f64 {
    if distance_km == 0.0 || total_hours == 0.0 || stops == 0 {
        return 0.0;
    }

    let stops = stops as f64;
    let driving_hours = total_hours - stops * config.ideal_hours_per_stop;
    let speed_efficiency = if driving_hours > 0.0 {
        (distance_km / driving_hours / config.ideal_speed_kmh * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let km_per_stop = distance_km / stops;
    let distance_efficiency =
        (100.0 - (km_per_stop - config.ideal_km_per_stop) * 10.0).clamp(0.0, 100.0);

    (speed_efficiency + distance_efficiency) / 2.0
}

pub fn fuel_estimate(distance_km: f64, config: &AnalyticsConfig) -> FuelEstimate {
    let liters = distance_km / config.fuel_km_per_liter;
    let cost = liters * config.fuel_price_per_liter;

    let rating = if liters < distance_km * 0.1 {
        FuelRating::Excellent
    } else if liters < distance_km * 0.15 {
        FuelRating::Good
    } else {
        FuelRating::NeedsImprovement
    };

    FuelEstimate {
        liters,
        cost,
        cost_usd: cost / config.exchange_rate_usd,
        rating,
    }
}

pub fn carbon_footprint(fuel: &FuelEstimate, config: &AnalyticsConfig) -> CarbonFootprint {
    let co2_kg = fuel.liters * config.co2_kg_per_liter;
    let grade = if co2_kg < 10.0 {
        'A'
    } else if co2_kg < 25.0 {
        'B'
    } else {
        'C'
    };

    CarbonFootprint {
        co2_kg,
        trees_daily_equivalent: co2_kg / config.tree_kg_co2_per_year * 365.0,
        grade,
    }
}

pub fn cost_breakdown(
    distance_km: f64,
    total_hours: f64,
    stops: usize,
    config: &AnalyticsConfig,
) -> CostBreakdown {
    let fuel_cost = fuel_estimate(distance_km, config).cost;
    let driver_cost = total_hours * config.driver_hourly_rate;
    let vehicle_wear = distance_km * config.wear_cost_per_km;
    let toll_costs = config.toll_cost * (stops / 3).max(1) as f64;
    let total_cost = fuel_cost + driver_cost + vehicle_wear + toll_costs;

    CostBreakdown {
        fuel_cost,
        driver_cost,
        vehicle_wear,
        toll_costs,
        total_cost,
        cost_per_delivery: if stops > 0 { total_cost / stops as f64 } else { total_cost },
        cost_per_km: if distance_km > 0.0 { total_cost / distance_km } else { 0.0 },
    }
}

pub fn complexity_analysis(insights: &[RouteInsight]) -> ComplexityAnalysis {
    let mut distribution: BTreeMap<TrafficComplexity, usize> =
        TrafficComplexity::ALL.iter().map(|&tier| (tier, 0)).collect();
    for insight in insights {
        *distribution.entry(insight.complexity).or_default() += 1;
    }

    let average_complexity = if insights.is_empty() {
        2.0
    } else {
        let total: u32 = insights
            .iter()
            .map(|insight| u32::from(insight.complexity.ordinal()))
            .sum();
        total as f64 / insights.len() as f64
    };

    let rating = if average_complexity < 1.5 {
        ComplexityRating::Low
    } else if average_complexity < 2.5 {
        ComplexityRating::Moderate
    } else if average_complexity < 3.5 {
        ComplexityRating::High
    } else {
        ComplexityRating::VeryHigh
    };

    let high_complexity_legs = insights
        .iter()
        .filter(|insight| insight.complexity.is_high())
        .count();

    ComplexityAnalysis {
        average_complexity,
        rating,
        high_complexity_legs,
        distribution,
    }
}

pub fn optimization_opportunities(
    insights: &[RouteInsight],
    config: &AnalyticsConfig,
) -> Vec<String> {
    if insights.is_empty() {
        return vec!["No route data available for optimization analysis".to_string()];
    }

    let mut opportunities = Vec::new();

    let long_legs = insights
        .iter()
        .filter(|insight| insight.estimated_time_hours > config.long_leg_hours)
        .count();
    if long_legs > 0 {
        opportunities.push(format!("Consider breaking down {} long segments", long_legs));
    }

    let congested = insights.iter().filter(|insight| insight.complexity.is_high()).count();
    if congested as f64 > insights.len() as f64 * 0.6 {
        opportunities
            .push("Route has high traffic complexity - consider off-peak scheduling".to_string());
    }

    let far_legs = insights
        .iter()
        .filter(|insight| insight.base_distance_km > config.long_leg_km)
        .count();
    if far_legs > 0 {
        opportunities.push(format!(
            "Optimize {} long-distance segments with intermediate stops",
            far_legs
        ));
    }

    if opportunities.is_empty() {
        opportunities
            .push("Route is well-optimized - no major improvements identified".to_string());
    }

    opportunities
}

pub fn performance_grade(efficiency_score: f64) -> &'static str {
    match efficiency_score {
        s if s >= 90.0 => "A+",
        s if s >= 85.0 => "A",
        s if s >= 80.0 => "B+",
        s if s >= 75.0 => "B",
        s if s >= 70.0 => "C+",
        s if s >= 65.0 => "C",
        _ => "D",
    }
}

pub fn sustainability_rating(co2_kg: f64) -> SustainabilityRating {
    if co2_kg < 5.0 {
        SustainabilityRating::Excellent
    } else if co2_kg < 15.0 {
        SustainabilityRating::Good
    } else if co2_kg < 30.0 {
        SustainabilityRating::Moderate
    } else {
        SustainabilityRating::NeedsImprovement
    }
}
