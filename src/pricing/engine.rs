use tracing::debug;

use crate::config::constant::{
    BASE_FEE, ELEVATION_COST_PER_1000_FT, FREE_MILES, MILEAGE_TIERS, PER_DROP_FEE,
};
use crate::domain::types::{RouteLeg, StopCost, TerrainInfo, Urgency};
use crate::error::QuoteError;

/// Pricing input for a single stop: how far it sits from the business
/// origin and the terrain between the two.
#[derive(Debug, Clone)]
pub struct StopPricingInput {
    pub stop_id: String,
    pub customer_name: String,
    pub distance_from_origin_miles: f64,
    pub terrain: TerrainInfo,
}

/// Cost breakdown before assembly into the final quote.
#[derive(Debug, Clone)]
pub struct PriceBreakdown {
    pub base_fee: f64,
    pub stop_costs: Vec<StopCost>,
    pub elevation_adjustment: f64,
    pub total_cost: f64,
    pub cost_per_customer: f64,
    pub max_terrain_multiplier: f64,
}

/// Round to currency precision. Applied at final aggregation only so
/// intermediate rounding error does not compound.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mileage charge for a stop: the first FREE_MILES are covered by the
/// per-drop fee, the excess is charged at the single rate of the tier the
/// whole distance falls in. Not a progressive bracket sum.
fn mileage_cost(distance_from_origin: f64) -> f64 {
    for (max_miles, rate) in MILEAGE_TIERS {
        if distance_from_origin <= max_miles {
            return (distance_from_origin - FREE_MILES).max(0.0) * rate;
        }
    }
    0.0
}

/// Price a computed route.
///
/// Per-stop costs are keyed by origin-to-stop distance and scaled by that
/// stop's terrain multiplier; the elevation adjustment sums over every leg
/// of the optimized route and is added once.
pub fn price(
    legs: &[RouteLeg],
    stops: &[StopPricingInput],
    urgency: Urgency,
) -> Result<PriceBreakdown, QuoteError> {
    if stops.is_empty() {
        return Err(QuoteError::NoStops);
    }

    let mut total = BASE_FEE;
    let mut stop_costs = Vec::with_capacity(stops.len());

    for stop in stops {
        let drop_cost =
            (PER_DROP_FEE + mileage_cost(stop.distance_from_origin_miles)) * stop.terrain.multiplier;
        debug!(
            "Stop {}: {:.2} miles from origin, x{:.2} terrain, ${:.2}",
            stop.stop_id, stop.distance_from_origin_miles, stop.terrain.multiplier, drop_cost
        );
        total += drop_cost;
        stop_costs.push(StopCost {
            stop_id: stop.stop_id.clone(),
            customer_name: stop.customer_name.clone(),
            distance_from_origin_miles: stop.distance_from_origin_miles,
            terrain_multiplier: stop.terrain.multiplier,
            cost: round2(drop_cost),
        });
    }

    let elevation_adjustment: f64 = legs
        .iter()
        .map(|leg| (leg.terrain.elevation_gain_ft / 1000.0) * ELEVATION_COST_PER_1000_FT)
        .sum();
    total += elevation_adjustment;

    total *= urgency.multiplier();

    let max_terrain_multiplier = legs
        .iter()
        .map(|leg| leg.terrain.multiplier)
        .fold(1.0, f64::max);

    Ok(PriceBreakdown {
        base_fee: BASE_FEE,
        stop_costs,
        elevation_adjustment: round2(elevation_adjustment),
        total_cost: round2(total),
        cost_per_customer: round2(total / stops.len() as f64),
        max_terrain_multiplier: round2(max_terrain_multiplier),
    })
}
