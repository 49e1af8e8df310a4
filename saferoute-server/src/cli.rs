use std::{net::SocketAddr, path::PathBuf};

use clap::{Parser, Subcommand};
use saferoute_core::{model::Location, routing::Criterion};

#[derive(Parser, Debug)]
#[command(
    name = "saferoute-server",
    version,
    about = "Flood-aware routing service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        /// Path to the TOML configuration
        #[arg(long, value_name = "PATH", default_value = "saferoute.toml")]
        config: PathBuf,
        /// Overrides `server.bind` from the configuration
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
    /// Compute a single route and print it as JSON
    Route {
        #[arg(long, value_name = "PATH")]
        config: PathBuf,
        /// Origin as LAT,LON
        #[arg(long, value_name = "LAT,LON", value_parser = parse_location)]
        from: Location,
        /// Destination as LAT,LON
        #[arg(long, value_name = "LAT,LON", value_parser = parse_location)]
        to: Location,
        /// distance, time, flood_height or risk_cost
        #[arg(long, default_value_t = Criterion::Distance)]
        criterion: Criterion,
        /// Print a GeoJSON FeatureCollection instead of the report
        #[arg(long)]
        geojson: bool,
    },
}

fn parse_location(value: &str) -> Result<Location, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{value}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{lat}'"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{lon}'"))?;

    let location = Location::new(lat, lon);
    if !location.is_valid() {
        return Err(format!("coordinates out of range: {lat}, {lon}"));
    }
    Ok(location)
}
