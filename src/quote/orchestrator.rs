use futures::future::try_join_all;
use itertools::Itertools;
use tracing::{debug, info, span, Level};

use crate::config::constant::{AVERAGE_SPEED_MPH, MINUTES_PER_STOP, TERRAIN_SEED};
use crate::distance::distance_miles;
use crate::domain::types::{
    GeoPoint, MultiDropQuote, QuoteRequest, ResolvedStop, RouteLeg, RouteNode, Urgency,
};
use crate::error::{QuoteError, StopRef};
use crate::geocode::{AddressResolver, Geocoder};
use crate::pricing;
use crate::route;
use crate::terrain::{TerrainClassifier, TerrainTables};

/// Drives one quote request through validation, concurrent address
/// resolution, route optimization, and pricing. Owns every intermediate
/// structure for the request; only the terrain tables are shared state.
pub struct QuoteOrchestrator<G> {
    resolver: AddressResolver<G>,
    classifier: TerrainClassifier,
}

impl<G: Geocoder> QuoteOrchestrator<G> {
    pub fn new(geocoder: G, tables: TerrainTables) -> Self {
        QuoteOrchestrator {
            resolver: AddressResolver::new(geocoder),
            classifier: TerrainClassifier::new(tables, TERRAIN_SEED),
        }
    }

    /// Compute a quote, or fail atomically with the phase and stop that
    /// broke. No partial quotes.
    pub async fn quote(&mut self, request: &QuoteRequest) -> Result<MultiDropQuote, QuoteError> {
        let urgency = self.validate(request)?;
        let (origin, resolved_stops) = self.resolve_addresses(request).await?;

        let optimized_route = {
            let s = span!(Level::INFO, "optimize_route", stops = resolved_stops.len());
            let _g = s.enter();
            let origin_node = RouteNode {
                stop_id: None,
                point: origin,
                city: request.business.city.clone(),
            };
            route::optimize(origin_node, &resolved_stops)
        };

        let s = span!(Level::INFO, "price_route");
        let _g = s.enter();

        let legs = self.build_legs(&optimized_route);
        let total_miles: f64 = legs.iter().map(|leg| leg.distance_miles).sum();

        let stop_inputs: Vec<pricing::StopPricingInput> = resolved_stops
            .iter()
            .map(|resolved| pricing::StopPricingInput {
                stop_id: resolved.stop.id.clone(),
                customer_name: resolved.stop.customer_name.clone(),
                distance_from_origin_miles: distance_miles(origin, resolved.point),
                terrain: self
                    .classifier
                    .classify(&request.business.city, &resolved.stop.address.city),
            })
            .collect();

        let breakdown = pricing::price(&legs, &stop_inputs, urgency)?;

        info!(
            "Quote complete: {:.1} miles, {} stops, ${:.2} total",
            total_miles,
            resolved_stops.len(),
            breakdown.total_cost
        );

        Ok(MultiDropQuote {
            base_fee: breakdown.base_fee,
            total_miles: (total_miles * 10.0).round() / 10.0,
            total_cost: breakdown.total_cost,
            cost_per_customer: breakdown.cost_per_customer,
            stop_costs: breakdown.stop_costs,
            estimated_time: estimate_time(total_miles, resolved_stops.len()),
            elevation_adjustment: breakdown.elevation_adjustment,
            max_terrain_multiplier: breakdown.max_terrain_multiplier,
            optimized_route,
            legs,
        })
    }

    /// Structural checks on every input address and the urgency value.
    fn validate(&self, request: &QuoteRequest) -> Result<Urgency, QuoteError> {
        let s = span!(Level::INFO, "validate_request");
        let _g = s.enter();

        if let Some(field) = request.business.missing_required_field() {
            return Err(QuoteError::InvalidAddress {
                stop: StopRef::Business,
                field,
            });
        }
        for stop in &request.stops {
            if let Some(field) = stop.address.missing_required_field() {
                return Err(QuoteError::InvalidAddress {
                    stop: StopRef::Stop(stop.id.clone()),
                    field,
                });
            }
        }

        let urgency: Urgency = request
            .urgency
            .parse()
            .map_err(QuoteError::InvalidUrgency)?;

        if request.stops.is_empty() {
            return Err(QuoteError::NoStops);
        }

        debug!(
            "Validated {} stops, urgency {}",
            request.stops.len(),
            urgency
        );
        Ok(urgency)
    }

    /// Resolve the business origin and every stop concurrently. The first
    /// failure cancels the remaining in-flight resolutions and fails the
    /// whole request with that stop's error.
    async fn resolve_addresses(
        &self,
        request: &QuoteRequest,
    ) -> Result<(GeoPoint, Vec<ResolvedStop>), QuoteError> {
        info!("Resolving {} addresses", request.stops.len() + 1);

        let origin_fut = async {
            self.resolver
                .resolve(&request.business)
                .await
                .map_err(|e| QuoteError::from_resolution(StopRef::Business, e))
        };

        let stop_futs = request.stops.iter().map(|stop| async {
            let point = self
                .resolver
                .resolve(&stop.address)
                .await
                .map_err(|e| QuoteError::from_resolution(StopRef::Stop(stop.id.clone()), e))?;
            Ok(ResolvedStop {
                stop: stop.clone(),
                point,
            })
        });

        let (origin, resolved) = tokio::try_join!(origin_fut, try_join_all(stop_futs))?;
        info!("Resolved {} addresses", resolved.len() + 1);
        Ok((origin, resolved))
    }

    /// Classify and measure each consecutive leg of the optimized route.
    fn build_legs(&mut self, optimized_route: &[RouteNode]) -> Vec<RouteLeg> {
        optimized_route
            .iter()
            .tuple_windows()
            .map(|(from, to)| RouteLeg {
                from_stop_id: from.stop_id.clone(),
                to_stop_id: to.stop_id.clone(),
                distance_miles: distance_miles(from.point, to.point),
                terrain: self.classifier.classify(&from.city, &to.city),
            })
            .collect()
    }
}

/// Time estimate the way the booking surface presents it: average speed
/// over the whole route plus a fixed stop allowance, rendered as "XhYm".
fn estimate_time(total_miles: f64, stop_count: usize) -> String {
    let minutes = ((total_miles / AVERAGE_SPEED_MPH) * 60.0).ceil() as usize
        + stop_count * MINUTES_PER_STOP;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Address, DeliveryStop, PackageType};
    use crate::error::QuotePhase;
    use crate::geocode::{GeocodeCandidate, GeocodeFailure};
    use std::collections::HashMap;

    /// Deterministic stand-in for the Nominatim client: maps query
    /// substrings to coordinates, returns no candidates otherwise.
    struct MapGeocoder {
        known: HashMap<&'static str, (f64, f64)>,
    }

    impl Geocoder for MapGeocoder {
        async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeFailure> {
            let hit = self
                .known
                .iter()
                .find(|(needle, _)| query.contains(*needle))
                .map(|(_, (lat, lon))| GeocodeCandidate {
                    lat: *lat,
                    lon: *lon,
                    display_name: query.to_string(),
                });
            Ok(hit.into_iter().collect())
        }
    }

    fn geocoder() -> MapGeocoder {
        let mut known = HashMap::new();
        known.insert("300 W Broadway", (40.7639, -111.8983)); // SLC origin
        known.insert("Murray", (40.6669, -111.8880));
        known.insert("Park City", (40.6461, -111.4980));
        known.insert("Midvale", (40.6111, -111.8990));
        MapGeocoder { known }
    }

    fn address(street_number: &str, street_name: &str, city: &str, zip: &str) -> Address {
        Address {
            street_number: street_number.to_string(),
            street_name: street_name.to_string(),
            city: city.to_string(),
            state: "UT".to_string(),
            zip_code: zip.to_string(),
            ..Default::default()
        }
    }

    fn stop(id: &str, addr: Address, customer: &str) -> DeliveryStop {
        DeliveryStop {
            id: id.to_string(),
            address: addr,
            package_type: PackageType::Small,
            package_description: "parts".to_string(),
            customer_name: customer.to_string(),
            contact_phone: "(801) 555-0100".to_string(),
        }
    }

    fn request(stops: Vec<DeliveryStop>, urgency: &str) -> QuoteRequest {
        QuoteRequest {
            business: address("300", "W Broadway", "Salt Lake City", "84101"),
            stops,
            urgency: urgency.to_string(),
        }
    }

    fn orchestrator() -> QuoteOrchestrator<MapGeocoder> {
        QuoteOrchestrator::new(geocoder(), TerrainTables::builtin())
    }

    #[tokio::test]
    async fn test_full_quote_for_three_stops() {
        let mut orch = orchestrator();
        let req = request(
            vec![
                stop("s1", address("100", "Main St Murray", "Murray", "84107"), "Ann"),
                stop("s2", address("200", "Main St Park City", "Park City", "84060"), "Ben"),
                stop("s3", address("300", "Main St Midvale", "Midvale", "84047"), "Cal"),
            ],
            "standard",
        );

        let quote = orch.quote(&req).await.unwrap();

        assert_eq!(quote.base_fee, 25.0);
        assert_eq!(quote.optimized_route.len(), 4);
        assert!(quote.optimized_route[0].stop_id.is_none());
        assert_eq!(quote.legs.len(), 3);
        assert_eq!(quote.stop_costs.len(), 3);
        assert!(quote.total_miles > 0.0);
        assert!(quote.total_cost > quote.base_fee);
        // Park City stop crosses the special SLC route at 1.45.
        assert!(quote.max_terrain_multiplier >= 1.35);

        let split = quote.cost_per_customer * 3.0;
        assert!((split - quote.total_cost).abs() <= 0.03);
    }

    #[tokio::test]
    async fn test_route_visits_near_stops_first() {
        let mut orch = orchestrator();
        let req = request(
            vec![
                stop("far", address("200", "Main St Park City", "Park City", "84060"), "Ben"),
                stop("near", address("100", "Main St Murray", "Murray", "84107"), "Ann"),
            ],
            "standard",
        );

        let quote = orch.quote(&req).await.unwrap();
        let order: Vec<&str> = quote.optimized_route[1..]
            .iter()
            .map(|n| n.stop_id.as_deref().unwrap())
            .collect();
        assert_eq!(order, vec!["near", "far"]);
    }

    #[tokio::test]
    async fn test_urgency_raises_total() {
        let stops = vec![stop(
            "s1",
            address("100", "Main St Murray", "Murray", "84107"),
            "Ann",
        )];

        let standard = orchestrator()
            .quote(&request(stops.clone(), "standard"))
            .await
            .unwrap();
        let express = orchestrator()
            .quote(&request(stops, "express"))
            .await
            .unwrap();

        assert!(express.total_cost > standard.total_cost);
    }

    #[tokio::test]
    async fn test_unresolvable_stop_fails_with_its_id() {
        let mut orch = orchestrator();
        let req = request(
            vec![
                stop("good", address("100", "Main St Murray", "Murray", "84107"), "Ann"),
                stop("bad", address("999", "Nowhere Rd", "Ghosttown", "00000"), "Eve"),
            ],
            "standard",
        );

        let err = orch.quote(&req).await.unwrap_err();
        assert!(matches!(err, QuoteError::AddressNotFound { .. }));
        assert_eq!(err.stop_ref(), Some(&StopRef::Stop("bad".to_string())));
        assert_eq!(err.phase(), QuotePhase::ResolvingAddresses);
    }

    #[tokio::test]
    async fn test_invalid_urgency_fails_validation() {
        let mut orch = orchestrator();
        let req = request(
            vec![stop("s1", address("100", "Main St Murray", "Murray", "84107"), "Ann")],
            "overnight",
        );

        let err = orch.quote(&req).await.unwrap_err();
        assert!(matches!(err, QuoteError::InvalidUrgency(ref v) if v == "overnight"));
        assert_eq!(err.phase(), QuotePhase::Validating);
    }

    #[tokio::test]
    async fn test_empty_stop_list_is_no_stops() {
        let mut orch = orchestrator();
        let err = orch.quote(&request(vec![], "standard")).await.unwrap_err();
        assert!(matches!(err, QuoteError::NoStops));
        assert_eq!(err.phase(), QuotePhase::Validating);
    }

    #[tokio::test]
    async fn test_incomplete_stop_address_fails_before_resolution() {
        let mut orch = orchestrator();
        let mut bad = address("100", "Main St Murray", "Murray", "84107");
        bad.street_name = String::new();
        let req = request(vec![stop("s1", bad, "Ann")], "standard");

        let err = orch.quote(&req).await.unwrap_err();
        assert!(
            matches!(err, QuoteError::InvalidAddress { field: "street_name", .. })
        );
        assert_eq!(err.phase(), QuotePhase::Validating);
    }

    #[test]
    fn test_estimated_time_formatting() {
        // 50 miles at 25 mph = 120 minutes, plus 2 stops at 10 minutes.
        assert_eq!(estimate_time(50.0, 2), "2h 20m");
        assert_eq!(estimate_time(0.0, 1), "0h 10m");
    }
}
