use anyhow::{Context, Result};
use crate::core::{JourneyInformation, Location, TimeSeries};
use crate::input::{InputError, LoadedTelemetry};

const TEMPERATURE_COLUMNS: &[&str] = &["temperature", "temp", "temperature_f"];
const PRESSURE_COLUMNS: &[&str] = &["pressure", "kpa", "pressure_kpa"];
const SPEED_COLUMNS: &[&str] = &["speed", "velocity", "speed_kmh"];
const X_COLUMNS: &[&str] = &["x", "x_coordinate", "pos_x"];
const Y_COLUMNS: &[&str] = &["y", "y_coordinate", "pos_y"];
const Z_COLUMNS: &[&str] = &["z", "z_coordinate", "pos_z"];

/// Column positions of the six values in a row
struct Columns {
    temperature: usize,
    pressure: usize,
    speed: usize,
    x: usize,
    y: usize,
    z: usize,
}

/// Load a dataset from CSV, one sample per row.
///
/// Columns are matched by name (case-insensitive) so their order is free:
/// - temperature,pressure,speed,x,y,z
/// - temp,kpa,velocity,x_coordinate,y_coordinate,z_coordinate
///
/// CSV files carry no journey information.
pub fn load_csv(data: &[u8]) -> Result<LoadedTelemetry> {
    let mut rdr = csv::Reader::from_reader(data);

    let headers = rdr.headers().context("Failed to read CSV header")?;
    let columns = detect_columns(headers)?;

    let mut temperature = Vec::new();
    let mut pressure = Vec::new();
    let mut speed = Vec::new();
    let mut location = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result.context("Failed to read CSV row")?;
        // Header is line 1
        let row = row + 2;

        temperature.push(parse_field(&record, columns.temperature, row, "temperature")?);
        pressure.push(parse_field(&record, columns.pressure, row, "pressure")?);
        speed.push(parse_field(&record, columns.speed, row, "speed")?);
        location.push(Location::new(
            parse_field(&record, columns.x, row, "x")?,
            parse_field(&record, columns.y, row, "y")?,
            parse_field(&record, columns.z, row, "z")?,
        ));
    }

    let records_read = temperature.len() as u64;
    let series = TimeSeries::new(temperature, pressure, speed, location)?;

    Ok(LoadedTelemetry {
        series,
        journey: JourneyInformation::default(),
        records_read,
    })
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> Result<Columns> {
    Ok(Columns {
        temperature: find_column(headers, TEMPERATURE_COLUMNS)?,
        pressure: find_column(headers, PRESSURE_COLUMNS)?,
        speed: find_column(headers, SPEED_COLUMNS)?,
        x: find_column(headers, X_COLUMNS)?,
        y: find_column(headers, Y_COLUMNS)?,
        z: find_column(headers, Z_COLUMNS)?,
    })
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &'static [&'static str]) -> Result<usize> {
    headers
        .iter()
        .position(|header| {
            let header_lower = header.trim().to_lowercase();
            names.iter().any(|&name| header_lower == name)
        })
        .ok_or_else(|| InputError::MissingColumn(names).into())
}

fn parse_field(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|_| {
        InputError::InvalidNumber {
            row,
            column,
            value: raw.to_string(),
        }
        .into()
    })
}
