//! Command-line interface parsing for geopin
//!
//! This module handles parsing of CLI arguments using clap and maps the
//! parsed flags onto a run mode: resolve locations, show cache statistics,
//! or clear the cache.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// No locations given and no maintenance flag set
    #[error("No locations given. Pass one or more location strings, or --stats / --clear")]
    NoLocations,

    /// --stats and --clear are mutually exclusive
    #[error("--stats and --clear cannot be combined")]
    ConflictingFlags,

    /// Location arguments make no sense together with a maintenance flag
    #[error("Location arguments cannot be combined with --stats or --clear")]
    UnexpectedLocations,
}

/// geopin - resolve location strings to map coordinates
#[derive(Parser, Debug)]
#[command(name = "geopin")]
#[command(about = "Resolve location strings to map coordinates")]
#[command(version)]
pub struct Cli {
    /// Location strings to resolve, either free-text addresses or "lat,lon" pairs
    ///
    /// Examples:
    ///   geopin "Berlin, Germany"
    ///   geopin "49.2743,-123.1544" "Alexanderplatz, Berlin"
    pub locations: Vec<String>,

    /// Print cache statistics and exit
    #[arg(long)]
    pub stats: bool,

    /// Clear the geocoding cache and exit
    #[arg(long)]
    pub clear: bool,

    /// Override the cache file location
    #[arg(long, value_name = "FILE")]
    pub cache_file: Option<PathBuf>,

    /// Emit resolution results as a JSON object
    #[arg(long)]
    pub json: bool,
}

/// What the process should do this run
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Resolve the given location strings and print the results
    Resolve(Vec<String>),
    /// Print cache statistics
    Stats,
    /// Clear the cache
    Clear,
}

impl Mode {
    /// Derives the run mode from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(Mode)` describing what to do
    /// * `Err(CliError)` if the flag combination is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.stats && cli.clear {
            return Err(CliError::ConflictingFlags);
        }
        if (cli.stats || cli.clear) && !cli.locations.is_empty() {
            return Err(CliError::UnexpectedLocations);
        }
        if cli.stats {
            return Ok(Mode::Stats);
        }
        if cli.clear {
            return Ok(Mode::Clear);
        }
        if cli.locations.is_empty() {
            return Err(CliError::NoLocations);
        }
        Ok(Mode::Resolve(cli.locations.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_locations() {
        let cli = Cli::parse_from(["geopin", "Berlin, Germany", "52.52,13.405"]);
        assert_eq!(cli.locations.len(), 2);
        assert!(!cli.stats);
        assert!(!cli.clear);
    }

    #[test]
    fn test_cli_parse_stats_flag() {
        let cli = Cli::parse_from(["geopin", "--stats"]);
        assert!(cli.stats);
        assert!(cli.locations.is_empty());
    }

    #[test]
    fn test_cli_parse_cache_file() {
        let cli = Cli::parse_from(["geopin", "--cache-file", "/tmp/geo.json", "Berlin"]);
        assert_eq!(cli.cache_file.as_deref(), Some(std::path::Path::new("/tmp/geo.json")));
    }

    #[test]
    fn test_mode_resolve() {
        let cli = Cli::parse_from(["geopin", "Berlin, Germany"]);
        let mode = Mode::from_cli(&cli).unwrap();
        assert_eq!(mode, Mode::Resolve(vec!["Berlin, Germany".to_string()]));
    }

    #[test]
    fn test_mode_stats() {
        let cli = Cli::parse_from(["geopin", "--stats"]);
        assert_eq!(Mode::from_cli(&cli).unwrap(), Mode::Stats);
    }

    #[test]
    fn test_mode_clear() {
        let cli = Cli::parse_from(["geopin", "--clear"]);
        assert_eq!(Mode::from_cli(&cli).unwrap(), Mode::Clear);
    }

    #[test]
    fn test_mode_no_locations_is_an_error() {
        let cli = Cli::parse_from(["geopin"]);
        let err = Mode::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("No locations"));
    }

    #[test]
    fn test_mode_stats_and_clear_conflict() {
        let cli = Cli::parse_from(["geopin", "--stats", "--clear"]);
        assert!(Mode::from_cli(&cli).is_err());
    }

    #[test]
    fn test_mode_locations_with_stats_is_an_error() {
        let cli = Cli::parse_from(["geopin", "--stats", "Berlin"]);
        assert!(Mode::from_cli(&cli).is_err());
    }
}
