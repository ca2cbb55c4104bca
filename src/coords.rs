//! Coordinate types and literal "lat,lon" parsing
//!
//! Event location fields sometimes contain literal coordinates instead of an
//! address. This module recognizes those strings so the resolver can skip the
//! cache and the geocoding provider entirely for them.

use serde::{Deserialize, Serialize};

/// A geographic coordinate pair
///
/// The latitude/longitude bounds invariant is enforced at construction via
/// [`Coordinate::new`]; the fields are public for reading only by convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, -90 to 90
    pub lat: f64,
    /// Longitude in degrees, -180 to 180
    pub lon: f64,
}

impl Coordinate {
    /// Creates a Coordinate if both values are finite and within bounds
    ///
    /// # Arguments
    /// * `lat` - Latitude in degrees
    /// * `lon` - Longitude in degrees
    ///
    /// # Returns
    /// * `Some(Coordinate)` if `-90 <= lat <= 90` and `-180 <= lon <= 180`
    /// * `None` otherwise
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self { lat, lon })
    }
}

/// Parses a literal `"lat,lon"` string into a Coordinate
///
/// Accepts two decimal numbers separated by a comma, each with optional
/// surrounding whitespace. Anything else, including out-of-range values,
/// yields `None` - that is the normal outcome for free-text addresses, not
/// an error.
pub fn parse_coordinate(input: &str) -> Option<Coordinate> {
    let (lat_token, lon_token) = input.split_once(',')?;
    let lat: f64 = lat_token.trim().parse().ok()?;
    let lon: f64 = lon_token.trim().parse().ok()?;
    Coordinate::new(lat, lon)
}
