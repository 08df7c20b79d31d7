pub mod nominatim;
pub mod resolver;

use std::future::Future;

use thiserror::Error;

pub use nominatim::NominatimGeocoder;
pub use resolver::AddressResolver;

/// One match returned by the geocoding collaborator.
#[derive(Debug, Clone)]
pub struct GeocodeCandidate {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// Failure kinds at the geocoder boundary. Zero candidates is not a failure
/// here; the resolver decides what an empty result set means.
#[derive(Debug, Error)]
pub enum GeocodeFailure {
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// External geocoding collaborator. Production wiring uses the Nominatim
/// HTTP implementation; tests substitute a deterministic fake.
pub trait Geocoder: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<GeocodeCandidate>, GeocodeFailure>> + Send;
}
