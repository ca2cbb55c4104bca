//! Persistent geocoding cache
//!
//! This module provides a file-backed cache mapping normalized location
//! strings to resolved coordinates. Failed lookups are recorded as tombstone
//! entries so the external provider is not asked the same hopeless question
//! twice. The whole map lives in one JSON file and is rewritten after each
//! mutation.

mod store;

pub use store::{CacheEntry, CacheStats, GeoCache};
