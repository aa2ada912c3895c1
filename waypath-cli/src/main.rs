use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use waypath::Coordinate;

mod commands;

/// Great-circle route distance CLI tool
#[derive(Parser)]
#[command(name = "waypath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output results as JSON
    #[arg(short, long, env = "WAYPATH_JSON", global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distance between two coordinates, in meters
    Distance {
        /// Start coordinate as "LAT,LON"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,

        /// End coordinate as "LAT,LON"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,
    },

    /// Total distance of a single route read from a file
    Route {
        /// Input file (CSV, or GeoJSON LineString/MultiPoint)
        input: PathBuf,

        /// Column name for latitude (CSV only)
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude (CSV only)
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Column name for waypoint order; rows are used as-is if absent (CSV only)
        #[arg(long, default_value = "order")]
        order_col: String,
    },

    /// Total distance of every route in a CSV file
    Batch {
        /// Input CSV file with one waypoint per row
        input: PathBuf,

        /// Output file (defaults to <input>_distances.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for the route name
        #[arg(long, default_value = "route")]
        route_col: String,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Column name for waypoint order; rows are used as-is if absent
        #[arg(long, default_value = "order")]
        order_col: String,
    },
}

/// Parse a "LAT,LON" pair into a validated coordinate.
fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {value:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude {lat:?}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude {lon:?}"))?;

    Coordinate::new(lat, lon).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Distance { from, to } => commands::distance::run(from, to, cli.json),
        Commands::Route {
            input,
            lat_col,
            lon_col,
            order_col,
        } => commands::route::run(input, lat_col, lon_col, order_col, cli.json),
        Commands::Batch {
            input,
            output,
            route_col,
            lat_col,
            lon_col,
            order_col,
        } => commands::batch::run(input, output, route_col, lat_col, lon_col, order_col),
    }
}
