use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use waypath::{
    geojson::coordinates_from_geometry, total_distance, total_distance_by_sequence,
    validate_sequences, Coordinate, Waypoint,
};

/// Column names used to read waypoints from CSV.
pub struct CsvColumns<'a> {
    /// Route name column; required when set.
    pub route: Option<&'a str>,
    pub lat: &'a str,
    pub lon: &'a str,
    /// Optional order column; ignored if the header is absent.
    pub order: &'a str,
}

/// A single waypoint row read from CSV.
pub struct Row {
    pub route: Option<String>,
    pub coordinate: Coordinate,
    pub order: Option<u32>,
}

pub fn read_csv(input: &Path, columns: &CsvColumns) -> Result<Vec<Row>> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h == name);

    let lat_idx = find(columns.lat)
        .with_context(|| format!("Column '{}' not found in CSV", columns.lat))?;
    let lon_idx = find(columns.lon)
        .with_context(|| format!("Column '{}' not found in CSV", columns.lon))?;
    let order_idx = find(columns.order);
    let route_idx = match columns.route {
        Some(name) => {
            Some(find(name).with_context(|| format!("Column '{}' not found in CSV", name))?)
        }
        None => None,
    };

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = i + 2;

        let lat: f64 = field(&record, lat_idx, "latitude", line)?
            .parse()
            .with_context(|| format!("Invalid latitude on line {}", line))?;
        let lon: f64 = field(&record, lon_idx, "longitude", line)?
            .parse()
            .with_context(|| format!("Invalid longitude on line {}", line))?;
        let coordinate = Coordinate::new(lat, lon)
            .with_context(|| format!("Invalid coordinate on line {}", line))?;

        let order = match order_idx {
            Some(idx) => Some(
                field(&record, idx, "order", line)?
                    .parse::<u32>()
                    .with_context(|| format!("Invalid order on line {}", line))?,
            ),
            None => None,
        };

        let route = match route_idx {
            Some(idx) => Some(field(&record, idx, "route", line)?.to_string()),
            None => None,
        };

        rows.push(Row {
            route,
            coordinate,
            order,
        });
    }

    Ok(rows)
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    what: &str,
    line: usize,
) -> Result<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .with_context(|| format!("Missing {} on line {}", what, line))
}

/// Read a single route's coordinates from a GeoJSON geometry or feature.
pub fn read_geojson(input: &Path) -> Result<Vec<Coordinate>> {
    let file = File::open(input).context("Failed to open input file")?;
    let geojson: geojson::GeoJson =
        serde_json::from_reader(BufReader::new(file)).context("Failed to parse GeoJSON")?;

    let geometry = match geojson {
        geojson::GeoJson::Geometry(geometry) => geometry,
        geojson::GeoJson::Feature(feature) => feature
            .geometry
            .context("GeoJSON feature has no geometry")?,
        geojson::GeoJson::FeatureCollection(mut fc) => {
            if fc.features.len() != 1 {
                bail!(
                    "Expected a single route, found {} features",
                    fc.features.len()
                );
            }
            fc.features
                .remove(0)
                .geometry
                .context("GeoJSON feature has no geometry")?
        }
    };

    Ok(coordinates_from_geometry(&geometry)?)
}

/// Total distance of one route's rows, in meters (unrounded).
///
/// Rows with an order are sorted by it; otherwise file order is used.
pub fn rows_distance(rows: &[Row]) -> Result<f64> {
    if rows.is_empty() {
        bail!("No waypoints found");
    }

    let waypoints: Option<Vec<Waypoint>> = rows
        .iter()
        .map(|r| r.order.map(|order| Waypoint::new(order, r.coordinate)))
        .collect();

    match waypoints {
        Some(waypoints) => {
            validate_sequences(&waypoints)?;
            Ok(total_distance_by_sequence(&waypoints))
        }
        None => {
            let coords: Vec<Coordinate> = rows.iter().map(|r| r.coordinate).collect();
            Ok(total_distance(&coords))
        }
    }
}
