use std::fmt;
use thiserror::Error;

use crate::geocode::resolver::ResolutionError;

/// Identifies which address a resolution failure belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopRef {
    Business,
    Stop(String),
}

impl fmt::Display for StopRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopRef::Business => write!(f, "business"),
            StopRef::Stop(id) => write!(f, "stop {}", id),
        }
    }
}

/// Phase of the quote pipeline an error surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePhase {
    Validating,
    ResolvingAddresses,
    Optimizing,
    Pricing,
}

/// Request-scoped failure. A quote is either fully computed or fails with
/// one of these; partial quotes are never returned.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("{stop}: address is missing required field '{field}'")]
    InvalidAddress { stop: StopRef, field: &'static str },

    #[error("unrecognized urgency value '{0}'")]
    InvalidUrgency(String),

    #[error("{stop}: no geocoding match for the given address")]
    AddressNotFound { stop: StopRef },

    #[error("{stop}: geocoding service unavailable: {source}")]
    ResolverUnavailable {
        stop: StopRef,
        #[source]
        source: crate::geocode::GeocodeFailure,
    },

    #[error("quote request contains no delivery stops")]
    NoStops,
}

impl QuoteError {
    /// The pipeline phase this error belongs to.
    pub fn phase(&self) -> QuotePhase {
        match self {
            QuoteError::InvalidAddress { .. } | QuoteError::InvalidUrgency(_) => {
                QuotePhase::Validating
            }
            QuoteError::AddressNotFound { .. } | QuoteError::ResolverUnavailable { .. } => {
                QuotePhase::ResolvingAddresses
            }
            // Raised by request validation; pricing re-checks but is only
            // reachable with a non-empty stop list.
            QuoteError::NoStops => QuotePhase::Validating,
        }
    }

    /// The stop the error is attributable to, when there is one.
    pub fn stop_ref(&self) -> Option<&StopRef> {
        match self {
            QuoteError::InvalidAddress { stop, .. }
            | QuoteError::AddressNotFound { stop }
            | QuoteError::ResolverUnavailable { stop, .. } => Some(stop),
            _ => None,
        }
    }

    /// Attach a stop reference to a bare resolution failure.
    pub fn from_resolution(stop: StopRef, err: ResolutionError) -> Self {
        match err {
            ResolutionError::InvalidAddress { field } => {
                QuoteError::InvalidAddress { stop, field }
            }
            ResolutionError::AddressNotFound => QuoteError::AddressNotFound { stop },
            ResolutionError::Unavailable(source) => {
                QuoteError::ResolverUnavailable { stop, source }
            }
        }
    }
}
