use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{JourneyInformation, Location, TimeSeries};
use crate::input::LoadedTelemetry;

/// Export layout: one array of single-field records per recording table
#[derive(Debug, Deserialize)]
struct TelemetryExport {
    temperature: Vec<TemperatureRecord>,
    pressure: Vec<PressureRecord>,
    speed: Vec<SpeedRecord>,
    location: Vec<LocationRecord>,
    #[serde(default)]
    journey: JourneyInformation,
}

#[derive(Debug, Deserialize)]
struct TemperatureRecord {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct PressureRecord {
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct SpeedRecord {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct LocationRecord {
    location: Location,
}

/// Load a dataset from the JSON export format
pub fn load_json(data: &[u8]) -> Result<LoadedTelemetry> {
    let export: TelemetryExport =
        serde_json::from_slice(data).context("Failed to parse telemetry JSON")?;

    let records_read = (export.temperature.len()
        + export.pressure.len()
        + export.speed.len()
        + export.location.len()) as u64;

    let series = TimeSeries::new(
        export.temperature.into_iter().map(|r| r.temperature).collect(),
        export.pressure.into_iter().map(|r| r.pressure).collect(),
        export.speed.into_iter().map(|r| r.speed).collect(),
        export.location.into_iter().map(|r| r.location).collect(),
    )?;

    Ok(LoadedTelemetry {
        series,
        journey: export.journey,
        records_read,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "temperature": [{"temperature": 10.1111, "recorded_at": "t0"}, {"temperature": 20.2222}],
        "pressure": [{"pressure": 99.5}, {"pressure": 100.25}],
        "speed": [{"speed": 25000.5}, {"speed": 25001.5}],
        "location": [
            {"location": {"x_coordinate": 12000, "y_coordinate": 13000, "z_coordinate": 5}},
            {"location": {"x_coordinate": 12010, "y_coordinate": 13010, "z_coordinate": 6}}
        ],
        "journey": {"mission": "Apollo 11", "distance_km": 384400}
    }"#;

    #[test]
    fn test_load_json() {
        let loaded = load_json(EXPORT.as_bytes()).unwrap();
        assert_eq!(loaded.series.len(), 2);
        assert_eq!(loaded.series.sample(0).unwrap().temperature, 10.1111);
        assert_eq!(loaded.series.sample(1).unwrap().temperature, 20.2222);
        assert_eq!(loaded.series.sample(1).unwrap().location, Location::new(12010.0, 13010.0, 6.0));
        assert_eq!(loaded.records_read, 8);
        assert_eq!(loaded.journey.entries()[0].1, "Apollo 11");
    }

    #[test]
    fn test_journey_is_optional() {
        let data = r#"{"temperature": [], "pressure": [], "speed": [], "location": []}"#;
        let loaded = load_json(data.as_bytes()).unwrap();
        assert!(loaded.series.is_empty());
        assert!(loaded.journey.is_empty());
    }

    #[test]
    fn test_mismatched_channels_rejected() {
        let data = r#"{
            "temperature": [{"temperature": 1.0}, {"temperature": 2.0}],
            "pressure": [{"pressure": 1.0}],
            "speed": [{"speed": 1.0}, {"speed": 2.0}],
            "location": []
        }"#;
        let err = load_json(data.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "pressure channel has 1 samples, expected 2");
    }

    #[test]
    fn test_missing_channel_rejected() {
        let err = load_json(br#"{"temperature": []}"#).unwrap_err();
        assert!(err.to_string().contains("Failed to parse telemetry JSON"));
    }
}
