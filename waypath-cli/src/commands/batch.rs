use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use waypath::round_distance;

use super::input::{read_csv, rows_distance, CsvColumns, Row};

/// Distance summary for one route in a batch file.
#[derive(Debug, PartialEq)]
pub struct RouteTotal {
    pub route: String,
    pub waypoint_count: usize,
    pub total_distance_meters: f64,
}

pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    route_col: String,
    lat_col: String,
    lon_col: String,
    order_col: String,
) -> Result<()> {
    let columns = CsvColumns {
        route: Some(route_col.as_str()),
        lat: &lat_col,
        lon: &lon_col,
        order: &order_col,
    };
    let rows = read_csv(&input, &columns)?;
    let groups = group_by_route(rows);

    let pb = ProgressBar::new(groups.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut totals = Vec::with_capacity(groups.len());
    for (route, rows) in groups {
        let meters =
            rows_distance(&rows).with_context(|| format!("Invalid route '{}'", route))?;
        totals.push(RouteTotal {
            route,
            waypoint_count: rows.len(),
            total_distance_meters: round_distance(meters),
        });
        pb.inc(1);
    }
    pb.finish_with_message("done");

    // Prepare output
    let output_path = output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "routes".to_string());
        input.with_file_name(format!("{}_distances.csv", stem))
    });
    write_totals(&output_path, &totals)?;

    println!(
        "{} routes written to: {}",
        totals.len(),
        output_path.display()
    );
    Ok(())
}

/// Group rows by route name, keeping routes in order of first appearance.
fn group_by_route(rows: Vec<Row>) -> Vec<(String, Vec<Row>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Row>)> = Vec::new();

    for row in rows {
        let name = row.route.clone().unwrap_or_default();
        match index.get(&name) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(name.clone(), groups.len());
                groups.push((name, vec![row]));
            }
        }
    }

    groups
}

fn write_totals(path: &Path, totals: &[RouteTotal]) -> Result<()> {
    let file = File::create(path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    writer.write_record(["route", "waypoint_count", "total_distance_meters"])?;
    for total in totals {
        writer.write_record([
            total.route.clone(),
            total.waypoint_count.to_string(),
            format!("{:.3}", total.total_distance_meters),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
