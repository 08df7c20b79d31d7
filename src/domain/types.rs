use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structured postal address as collected from the booking form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub business_name: String,
    pub street_number: String,
    pub street_name: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Address {
    /// Returns the first required field that is empty, if any.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.street_number.trim().is_empty() {
            Some("street_number")
        } else if self.street_name.trim().is_empty() {
            Some("street_name")
        } else if self.city.trim().is_empty() {
            Some("city")
        } else if self.zip_code.trim().is_empty() {
            Some("zip_code")
        } else {
            None
        }
    }

    /// Single-line query string for the geocoder, whitespace collapsed.
    pub fn to_query(&self) -> String {
        let street = if self.address_line2.trim().is_empty() {
            format!("{} {}", self.street_number, self.street_name)
        } else {
            format!(
                "{} {} {}",
                self.street_number, self.street_name, self.address_line2
            )
        };
        let full = format!("{}, {}, {} {}", street, self.city, self.state, self.zip_code);
        full.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Latitude/longitude in decimal degrees. Produced by the address resolver;
/// only tests build these by hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Envelope,
    Small,
    Medium,
    Large,
    Fragile,
}

/// One delivery in a multi-drop request, keyed by a caller-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStop {
    pub id: String,
    pub address: Address,
    pub package_type: PackageType,
    pub package_description: String,
    pub customer_name: String,
    pub contact_phone: String,
}

/// A delivery stop paired with its geocoded coordinates.
#[derive(Debug, Clone)]
pub struct ResolvedStop {
    pub stop: DeliveryStop,
    pub point: GeoPoint,
}

/// One visited point in the optimized route. `stop_id` is None for the
/// business origin.
#[derive(Debug, Clone, Serialize)]
pub struct RouteNode {
    pub stop_id: Option<String>,
    pub point: GeoPoint,
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainType {
    Flat,
    Hilly,
    Mountainous,
}

/// Terrain classification for a pair of localities.
#[derive(Debug, Clone, Serialize)]
pub struct TerrainInfo {
    pub multiplier: f64,
    pub elevation_gain_ft: f64,
    pub terrain_type: TerrainType,
    pub description: String,
}

/// One directed segment between two consecutive visited points.
#[derive(Debug, Clone, Serialize)]
pub struct RouteLeg {
    pub from_stop_id: Option<String>,
    pub to_stop_id: Option<String>,
    pub distance_miles: f64,
    pub terrain: TerrainInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Standard,
    SameDay,
    Express,
}

impl Urgency {
    pub fn multiplier(&self) -> f64 {
        match self {
            Urgency::Standard => 1.0,
            Urgency::SameDay => 1.25,
            Urgency::Express => 1.5,
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Urgency::Standard),
            "same-day" => Ok(Urgency::SameDay),
            "express" => Ok(Urgency::Express),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Standard => write!(f, "standard"),
            Urgency::SameDay => write!(f, "same-day"),
            Urgency::Express => write!(f, "express"),
        }
    }
}

/// Quote request as received from the booking surface. Urgency arrives as
/// free text and is validated by the orchestrator.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub business: Address,
    pub stops: Vec<DeliveryStop>,
    pub urgency: String,
}

/// Final cost attributed to a single stop.
#[derive(Debug, Clone, Serialize)]
pub struct StopCost {
    pub stop_id: String,
    pub customer_name: String,
    pub distance_from_origin_miles: f64,
    pub terrain_multiplier: f64,
    pub cost: f64,
}

/// The output aggregate. Immutable once built; recomputing with different
/// inputs always produces a new quote.
#[derive(Debug, Clone, Serialize)]
pub struct MultiDropQuote {
    pub base_fee: f64,
    pub total_miles: f64,
    pub total_cost: f64,
    pub cost_per_customer: f64,
    pub stop_costs: Vec<StopCost>,
    pub optimized_route: Vec<RouteNode>,
    pub legs: Vec<RouteLeg>,
    pub estimated_time: String,
    pub elevation_adjustment: f64,
    pub max_terrain_multiplier: f64,
}
