use anyhow::{bail, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use waypath::{round_distance, total_distance};

use super::input::{read_csv, read_geojson, rows_distance, CsvColumns};

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub waypoints: usize,
    pub total_distance_meters: f64,
}

pub fn run(
    input: PathBuf,
    lat_col: String,
    lon_col: String,
    order_col: String,
    json: bool,
) -> Result<()> {
    let columns = CsvColumns {
        route: None,
        lat: &lat_col,
        lon: &lon_col,
        order: &order_col,
    };
    let response = measure(&input, &columns)?;

    if json {
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!(
            "{:.3} m ({} waypoints)",
            response.total_distance_meters, response.waypoints
        );
    }

    Ok(())
}

/// Read one route from `input` and report its rounded total distance.
pub fn measure(input: &Path, columns: &CsvColumns) -> Result<RouteResponse> {
    // Detect file format
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let (waypoints, meters) = match extension.as_str() {
        "csv" => {
            let rows = read_csv(input, columns)?;
            (rows.len(), rows_distance(&rows)?)
        }
        "geojson" | "json" => {
            let coords = read_geojson(input)?;
            if coords.is_empty() {
                bail!("No waypoints found");
            }
            (coords.len(), total_distance(&coords))
        }
        _ => bail!(
            "Unsupported file format: {}. Use .csv or .geojson",
            extension
        ),
    };

    Ok(RouteResponse {
        waypoints,
        total_distance_meters: round_distance(meters),
    })
}
