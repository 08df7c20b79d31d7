use crate::domain::types::GeoPoint;

const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle (haversine) distance between two points, in miles.
pub fn distance_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slc() -> GeoPoint {
        GeoPoint {
            lat: 40.7608,
            lon: -111.8910,
        }
    }

    fn park_city() -> GeoPoint {
        GeoPoint {
            lat: 40.6461,
            lon: -111.4980,
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let d1 = distance_miles(slc(), park_city());
        let d2 = distance_miles(park_city(), slc());
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_miles(slc(), slc()), 0.0);
    }

    #[test]
    fn test_distance_is_non_negative() {
        let a = GeoPoint { lat: -33.86, lon: 151.21 };
        let b = GeoPoint { lat: 51.50, lon: -0.12 };
        assert!(distance_miles(a, b) > 0.0);
    }

    #[test]
    fn test_known_distance_nyc_to_la() {
        // NYC to LA is roughly 2,445 miles great-circle.
        let nyc = GeoPoint { lat: 40.7128, lon: -74.0060 };
        let la = GeoPoint { lat: 34.0522, lon: -118.2437 };
        let d = distance_miles(nyc, la);
        assert!((d - 2445.0).abs() < 30.0, "got {d}");
    }

    #[test]
    fn test_slc_to_park_city_magnitude() {
        // Straight-line SLC to Park City is around 22 miles.
        let d = distance_miles(slc(), park_city());
        assert!(d > 15.0 && d < 30.0, "got {d}");
    }
}
