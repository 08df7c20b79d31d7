use tracing::debug;

use crate::distance::distance_miles;
use crate::domain::types::{ResolvedStop, RouteNode};

/// Order the stops with a greedy nearest-neighbor pass from the origin.
///
/// Not a true optimizer: O(n^2), no global tour guarantee. Batches are small
/// (typically under 20 stops) so this trade-off holds up in practice. Ties
/// break on input order: the strict `<` comparison keeps the first seen.
pub fn optimize(origin: RouteNode, stops: &[ResolvedStop]) -> Vec<RouteNode> {
    let mut route = vec![origin];
    let mut unvisited: Vec<&ResolvedStop> = stops.iter().collect();
    let mut current = route[0].point;

    while !unvisited.is_empty() {
        let mut nearest_idx = 0;
        let mut nearest_distance = distance_miles(current, unvisited[0].point);

        for (i, candidate) in unvisited.iter().enumerate().skip(1) {
            let d = distance_miles(current, candidate.point);
            if d < nearest_distance {
                nearest_idx = i;
                nearest_distance = d;
            }
        }

        let nearest = unvisited.remove(nearest_idx);
        debug!(
            "Next stop {} at {:.2} miles",
            nearest.stop.id, nearest_distance
        );
        route.push(RouteNode {
            stop_id: Some(nearest.stop.id.clone()),
            point: nearest.point,
            city: nearest.stop.address.city.clone(),
        });
        current = nearest.point;
    }

    route
}
