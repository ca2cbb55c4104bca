//! External geocoding provider integration
//!
//! Defines the `Geocoder` seam the resolver talks to and the concrete
//! Nominatim-backed implementation. Keeping the provider behind a trait means
//! swapping services later only touches this module.

pub mod nominatim;

use std::future::Future;
use std::pin::Pin;

use reqwest::StatusCode;
use thiserror::Error;

use crate::coords::Coordinate;

pub use nominatim::NominatimClient;

/// Errors that can occur when querying the geocoding provider
///
/// These never reach the public resolve contract; the resolver downgrades
/// them to "no coordinate available" after logging.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error or timeout)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Provider returned status {0}")]
    ErrorStatus(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A geocoding provider that resolves free-text addresses to coordinates.
pub trait Geocoder: Send + Sync {
    /// Looks up an address with the provider
    ///
    /// `Ok(None)` means the provider answered but had no usable match;
    /// `Err` means the provider could not be asked or answered garbage.
    fn lookup<'a>(
        &'a self,
        address: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Coordinate>, GeocodeError>> + Send + 'a>>;
}
