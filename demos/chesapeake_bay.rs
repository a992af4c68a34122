//! demos/chesapeake_bay.rs
//!
//! This example matches a handful of Chesapeake Bay tide stations to a synthetic model grid,
//! pulls out each station's model series and compares one of them to observed levels.
//!
//! To run this example:
//! cargo run --example chesapeake_bay

use std::error::Error;

use chrono::{Duration, NaiveDate};
use ofs_tide::{ReferenceStation, TideComparer};
use polars::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    // 1. Stations as they come back from a metadata query
    let stations: Vec<ReferenceStation> = serde_json::from_str(
        r#"[
            {"id": "8575512", "name": "Annapolis", "lat": 38.9833, "lon": -76.4816},
            {"id": "8638610", "name": "Sewells Point", "lat": 36.9467, "lon": -76.33}
        ]"#,
    )?;

    // 2. A tiny model table: 6-minute water levels on three grid points
    let start = NaiveDate::from_ymd_opt(2016, 1, 1)
        .ok_or("invalid date")?
        .and_hms_opt(0, 0, 0)
        .ok_or("invalid time")?;
    let times: Vec<_> = (0..5).map(|i| start + Duration::minutes(6 * i)).collect();
    let model = df!(
        "datetime" => &times,
        "38.98_-76.48" => [0.31, 0.35, 0.40, 0.42, 0.41],
        "37.5_-76.2" => [0.55, 0.57, 0.60, 0.61, 0.60],
        "36.95_-76.33" => [0.80, 0.76, 0.70, 0.66, 0.65],
    )?;

    // 3. Match stations to grid points and extract their series
    let comparer = TideComparer::default();
    let aligned = comparer.align().model(model).stations(&stations).call()?;
    println!("{}", aligned.station_table()?);
    println!("{}", aligned.model);

    // 4. Compare against observations for the same period
    let observed = df!(
        "datetime" => &times,
        "8575512" => [0.30, 0.36, 0.38, 0.43, 0.40],
    )?;
    println!(
        "Observations needed from {} to {}",
        aligned.time_span.start, aligned.time_span.end
    );
    println!("{}", aligned.compare(&observed, "8575512")?);

    Ok(())
}
