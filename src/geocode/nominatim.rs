//! Nominatim geocoding API client
//!
//! This module provides functionality to resolve free-text addresses against
//! the OpenStreetMap Nominatim search endpoint. Nominatim's usage policy
//! requires an identifying User-Agent on every request; the client sends the
//! crate name and version.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::{header, Client};
use serde::Deserialize;

use super::{GeocodeError, Geocoder};
use crate::coords::Coordinate;

/// Base URL for the Nominatim search API
const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Identification header value required by the Nominatim usage policy
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Timeout for a single provider call, so one hanging request cannot stall a batch
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for resolving addresses via the Nominatim API
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NominatimClient {
    /// Create a new NominatimClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: NOMINATIM_BASE_URL.to_string(),
        }
    }

    /// Create a new NominatimClient with a custom endpoint URL
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Query the provider for an address
    ///
    /// # Arguments
    /// * `address` - Free-text address to resolve
    ///
    /// # Returns
    /// * `Ok(Some(Coordinate))` - First candidate with valid coordinates
    /// * `Ok(None)` - No candidates, or the first candidate was unusable
    /// * `Err(GeocodeError)` - Transport failure, error status, or a body
    ///   that was not the expected JSON shape
    pub async fn search(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .header(header::USER_AGENT, USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::ErrorStatus(status));
        }

        let text = response.text().await?;
        let candidates: Vec<SearchResult> = serde_json::from_str(&text)?;

        Ok(first_coordinate(&candidates))
    }
}

impl Geocoder for NominatimClient {
    fn lookup<'a>(
        &'a self,
        address: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Coordinate>, GeocodeError>> + Send + 'a>> {
        Box::pin(self.search(address))
    }
}

/// Extracts a Coordinate from the first candidate, if it has one
///
/// Nominatim returns latitude/longitude as strings. A candidate whose fields
/// do not parse, or parse to out-of-range values, counts as a failed lookup
/// rather than an error.
fn first_coordinate(candidates: &[SearchResult]) -> Option<Coordinate> {
    let candidate = candidates.first()?;
    let lat: f64 = candidate.lat.trim().parse().ok()?;
    let lon: f64 = candidate.lon.trim().parse().ok()?;
    Coordinate::new(lat, lon)
}

/// A single match in the Nominatim response list
#[derive(Debug, Deserialize)]
struct SearchResult {
    /// Latitude as decimal text
    lat: String,
    /// Longitude as decimal text
    lon: String,
    /// Human-readable label for the match
    #[allow(dead_code)]
    display_name: Option<String>,
}
