use anyhow::Result;
use serde::Serialize;
use waypath::{distance, round_distance, Coordinate};

#[derive(Debug, Serialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinate> for Point {
    fn from(coord: Coordinate) -> Self {
        Self {
            lat: coord.lat(),
            lon: coord.lon(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub from: Point,
    pub to: Point,
    pub distance_meters: f64,
}

impl DistanceResponse {
    pub fn new(from: Coordinate, to: Coordinate) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            distance_meters: round_distance(distance(from, to)),
        }
    }
}

pub fn run(from: Coordinate, to: Coordinate, json: bool) -> Result<()> {
    let response = DistanceResponse::new(from, to);

    if json {
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{:.3} m", response.distance_meters);
    }

    Ok(())
}
