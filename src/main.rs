//! geopin - resolve location strings to map coordinates
//!
//! A small CLI over the resolution subsystem: resolves free-text addresses
//! and literal coordinate pairs, with a persistent cache so repeated queries
//! never hit the geocoding provider twice.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use geopin::cache::GeoCache;
use geopin::cli::{Cli, Mode};
use geopin::resolver::Resolver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("geopin=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = match Mode::from_cli(&cli) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let cache_file = match cli.cache_file.clone() {
        Some(file) => file,
        None => GeoCache::default_file()
            .ok_or("could not determine a cache directory; pass --cache-file")?,
    };
    let cache = GeoCache::open(cache_file);

    match mode {
        Mode::Stats => {
            let stats = cache.stats();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{} cached location(s)", stats.size);
                for location in stats.locations {
                    println!("  {location}");
                }
            }
        }
        Mode::Clear => {
            cache.clear()?;
            println!("Cache cleared");
        }
        Mode::Resolve(locations) => {
            let resolver = Resolver::with_nominatim(cache);
            let results = resolver.resolve_batch(&locations).await;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for location in &locations {
                    match results.get(location) {
                        Some(coord) => println!("{location} -> {}, {}", coord.lat, coord.lon),
                        None => println!("{location} -> (no result)"),
                    }
                }
            }
        }
    }

    Ok(())
}
