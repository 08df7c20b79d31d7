use thiserror::Error;
use tracing::{debug, info};

use crate::domain::types::{Address, GeoPoint};
use crate::geocode::{GeocodeFailure, Geocoder};

/// Why a single address failed to resolve. The orchestrator attaches the
/// owning stop id before surfacing these.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("address is missing required field '{field}'")]
    InvalidAddress { field: &'static str },

    #[error("geocoder returned no match")]
    AddressNotFound,

    #[error("geocoder unavailable: {0}")]
    Unavailable(#[from] GeocodeFailure),
}

/// Turns a postal address into coordinates through the geocoding
/// collaborator. Pure adapter: validation, query normalization, and error
/// normalization live here; retries and caching live in the geocoder.
#[derive(Debug)]
pub struct AddressResolver<G> {
    geocoder: G,
}

impl<G: Geocoder> AddressResolver<G> {
    pub fn new(geocoder: G) -> Self {
        AddressResolver { geocoder }
    }

    /// Resolve one address. Structurally invalid addresses fail before any
    /// network call is made.
    pub async fn resolve(&self, address: &Address) -> Result<GeoPoint, ResolutionError> {
        if let Some(field) = address.missing_required_field() {
            return Err(ResolutionError::InvalidAddress { field });
        }

        let query = address.to_query();
        debug!("Resolving '{}'", query);

        let candidates = self.geocoder.search(&query).await?;
        let best = candidates.first().ok_or(ResolutionError::AddressNotFound)?;

        info!(
            "Resolved '{}' to ({:.5}, {:.5}) via '{}'",
            query, best.lat, best.lon, best.display_name
        );
        Ok(GeoPoint {
            lat: best.lat,
            lon: best.lon,
        })
    }
}
