//! Location resolution orchestration
//!
//! Composes the coordinate parser, the persistent cache, and the geocoding
//! provider into the public resolve contract. The strategy order per query
//! is fixed: literal coordinate parse first, then cache, then one provider
//! call whose outcome is cached (a tombstone on failure) before returning.
//!
//! Every failure path degrades to "no coordinate available" for that one
//! query; nothing in here is fatal to the host process.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cache::{CacheEntry, GeoCache};
use crate::coords::{parse_coordinate, Coordinate};
use crate::geocode::{Geocoder, NominatimClient};

/// Resolves location strings to coordinates
///
/// Cloning shares the underlying cache and provider, so one resolver can be
/// handed to several tasks.
#[derive(Clone)]
pub struct Resolver {
    cache: GeoCache,
    geocoder: Arc<dyn Geocoder>,
}

impl Resolver {
    /// Creates a resolver over the given cache and provider
    pub fn new(cache: GeoCache, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { cache, geocoder }
    }

    /// Creates a resolver backed by the Nominatim provider
    pub fn with_nominatim(cache: GeoCache) -> Self {
        Self::new(cache, Arc::new(NominatimClient::new()))
    }

    /// Resolves a single location string to a coordinate
    ///
    /// Literal `"lat,lon"` strings are parsed directly and bypass both the
    /// cache and the network; parsing is cheap and deterministic, so caching
    /// those would only waste space. Free text goes through the cache, and
    /// on a miss through the provider, whose outcome (coordinate or
    /// tombstone) is persisted before this returns.
    ///
    /// # Arguments
    /// * `query` - Raw location string, coordinate pair or free-text address
    ///
    /// # Returns
    /// * `Some(Coordinate)` if the query resolved
    /// * `None` for empty input, unresolvable text, or provider failure
    pub async fn resolve(&self, query: &str) -> Option<Coordinate> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(coord) = parse_coordinate(trimmed) {
            return Some(coord);
        }

        if let Some(entry) = self.cache.get(trimmed) {
            // A tombstone hit is still a hit: the provider already said no
            return entry.coordinate;
        }

        let entry = match self.geocoder.lookup(trimmed).await {
            Ok(Some(coord)) => CacheEntry::found(coord),
            Ok(None) => {
                tracing::debug!(query = trimmed, "provider returned no match");
                CacheEntry::not_found()
            }
            Err(err) => {
                tracing::warn!(query = trimmed, %err, "geocoding lookup failed");
                CacheEntry::not_found()
            }
        };

        // The in-memory cache stays authoritative even if the write fails
        if let Err(err) = self.cache.put(trimmed, entry.clone()) {
            tracing::warn!(query = trimmed, %err, "failed to persist cache entry");
        }

        entry.coordinate
    }

    /// Resolves a batch of location strings
    ///
    /// Entries that trim to empty are dropped, identical texts are resolved
    /// at most once, and the distinct lookups run concurrently. One query
    /// failing never aborts the others. The result maps every original query
    /// string that resolved (duplicates included) to its coordinate;
    /// unresolvable queries are simply absent.
    pub async fn resolve_batch(&self, queries: &[String]) -> HashMap<String, Coordinate> {
        let mut seen = HashSet::new();
        let mut distinct = Vec::new();
        for query in queries {
            let trimmed = query.trim();
            if trimmed.is_empty() {
                continue;
            }
            if seen.insert(trimmed) {
                distinct.push(trimmed);
            }
        }

        let lookups = distinct
            .iter()
            .map(|&text| async move { (text, self.resolve(text).await) });
        let outcomes = futures::future::join_all(lookups).await;

        let resolved: HashMap<&str, Coordinate> = outcomes
            .into_iter()
            .filter_map(|(text, coord)| coord.map(|c| (text, c)))
            .collect();

        // Fan results back out to the original query strings
        let mut results = HashMap::new();
        for query in queries {
            if let Some(coord) = resolved.get(query.trim()) {
                results.insert(query.clone(), *coord);
            }
        }
        results
    }

    /// Returns statistics about the underlying cache
    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    /// Empties the underlying cache
    pub fn clear_cache(&self) -> std::io::Result<()> {
        self.cache.clear()
    }
}
