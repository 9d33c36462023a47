use std::fmt;
use thiserror::Error;

use crate::core::sample::{
    DisplaySample, Location, Reading, PRESSURE_PRECISION, SPEED_PRECISION, TEMPERATURE_PRECISION,
};

/// One of the four parallel telemetry series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Temperature,
    Pressure,
    Speed,
    Location,
}

impl Channel {
    /// Name of the recording table the channel was exported from
    pub fn source_table(&self) -> &'static str {
        match self {
            Channel::Temperature => "spacecraft_temperature_over_time",
            Channel::Pressure => "spacecraft_pressure_over_time",
            Channel::Speed => "spacecraft_speed_over_time",
            Channel::Location => "spacecraft_location_over_time",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Temperature => "temperature",
            Channel::Pressure => "pressure",
            Channel::Speed => "speed",
            Channel::Location => "location",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("{channel} channel has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: Channel,
        expected: usize,
        found: usize,
    },
}

/// The raw values of all four channels at one cursor position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub temperature: f64,
    pub pressure: f64,
    pub speed: f64,
    pub location: Location,
}

impl RawSample {
    /// Build the display state for this sample; `index` is the advanced cursor
    pub fn to_display(&self, index: usize) -> DisplaySample {
        DisplaySample {
            temperature: Some(Reading::with_precision(self.temperature, TEMPERATURE_PRECISION)),
            pressure: Some(Reading::with_precision(self.pressure, PRESSURE_PRECISION)),
            speed: Some(Reading::with_precision(self.speed, SPEED_PRECISION)),
            location: self.location,
            index,
        }
    }
}

/// A recorded journey: four equal-length channels sharing one index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    temperature: Vec<f64>,
    pressure: Vec<f64>,
    speed: Vec<f64>,
    location: Vec<Location>,
}

impl TimeSeries {
    /// Create a series, rejecting channels whose lengths differ from temperature
    pub fn new(
        temperature: Vec<f64>,
        pressure: Vec<f64>,
        speed: Vec<f64>,
        location: Vec<Location>,
    ) -> Result<Self, DatasetError> {
        let expected = temperature.len();
        let lengths = [
            (Channel::Pressure, pressure.len()),
            (Channel::Speed, speed.len()),
            (Channel::Location, location.len()),
        ];

        if let Some(&(channel, found)) = lengths.iter().find(|(_, len)| *len != expected) {
            return Err(DatasetError::ChannelLengthMismatch { channel, expected, found });
        }

        Ok(Self { temperature, pressure, speed, location })
    }

    /// Number of samples in every channel
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// Read all four channels at `index`
    pub fn sample(&self, index: usize) -> Option<RawSample> {
        Some(RawSample {
            temperature: *self.temperature.get(index)?,
            pressure: *self.pressure.get(index)?,
            speed: *self.speed.get(index)?,
            location: *self.location.get(index)?,
        })
    }
}

/// Dataset handed to the playback driver
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Dataset {
    #[default]
    NotLoaded,
    Loaded(TimeSeries),
}

impl Dataset {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Dataset::Loaded(_))
    }

    pub fn series(&self) -> Option<&TimeSeries> {
        match self {
            Dataset::Loaded(series) => Some(series),
            Dataset::NotLoaded => None,
        }
    }

    /// Sample count, zero when nothing is loaded
    pub fn len(&self) -> usize {
        self.series().map_or(0, TimeSeries::len)
    }
}

impl From<TimeSeries> for Dataset {
    fn from(series: TimeSeries) -> Self {
        Dataset::Loaded(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(len: usize) -> TimeSeries {
        TimeSeries::new(
            (0..len).map(|i| i as f64).collect(),
            (0..len).map(|i| 100.0 + i as f64).collect(),
            (0..len).map(|i| 25000.0 + i as f64).collect(),
            (0..len).map(|i| Location::new(i as f64, i as f64 * 2.0, 0.0)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_channels_must_match_length() {
        let err = TimeSeries::new(
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![Location::default()],
        )
        .unwrap_err();

        assert_eq!(
            err,
            DatasetError::ChannelLengthMismatch {
                channel: Channel::Location,
                expected: 2,
                found: 1,
            }
        );
        assert_eq!(err.to_string(), "location channel has 1 samples, expected 2");
    }

    #[test]
    fn test_sample_reads_all_channels() {
        let series = series(3);
        let sample = series.sample(2).unwrap();
        assert_eq!(sample.temperature, 2.0);
        assert_eq!(sample.pressure, 102.0);
        assert_eq!(sample.speed, 25002.0);
        assert_eq!(sample.location, Location::new(2.0, 4.0, 0.0));
        assert!(series.sample(3).is_none());
    }

    #[test]
    fn test_to_display_formats_readings() {
        let raw = RawSample {
            temperature: 72.34567,
            pressure: 101.325,
            speed: 27654.321987,
            location: Location::new(12000.0, 13000.0, 50.0),
        };
        let display = raw.to_display(1);
        assert_eq!(display.temperature.unwrap().text, "72.35");
        assert_eq!(display.pressure.unwrap().text, "101.3");
        assert_eq!(display.speed.unwrap().text, "27654.32");
        assert_eq!(display.location.x_coordinate, 12000.0);
        assert_eq!(display.index, 1);
    }

    #[test]
    fn test_dataset_len() {
        assert_eq!(Dataset::NotLoaded.len(), 0);
        assert!(!Dataset::NotLoaded.is_loaded());
        let dataset = Dataset::from(series(5));
        assert!(dataset.is_loaded());
        assert_eq!(dataset.len(), 5);
    }

    #[test]
    fn test_source_tables() {
        assert_eq!(Channel::Speed.source_table(), "spacecraft_speed_over_time");
        assert_eq!(Channel::Location.source_table(), "spacecraft_location_over_time");
        assert_eq!(Channel::Pressure.to_string(), "pressure");
    }
}
