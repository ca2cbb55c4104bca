//! geopin library
//!
//! Resolves free-text or coordinate-pair location strings to geographic
//! coordinates, backed by a persistent deduplicating cache and an external
//! geocoding provider. Host applications hand [`resolver::Resolver`] a list
//! of location strings and get back a map of the ones that resolved.

pub mod cache;
pub mod cli;
pub mod coords;
pub mod geocode;
pub mod resolver;
