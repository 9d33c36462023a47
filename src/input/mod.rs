pub mod csv;
pub mod json;

pub use self::csv::load_csv;
pub use self::json::load_json;

use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;
use crate::core::{JourneyInformation, TimeSeries};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown input format")]
    UnknownFormat,
    #[error("could not find column with names: {0:?}")]
    MissingColumn(&'static [&'static str]),
    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// A dataset file after parsing
#[derive(Debug, Clone)]
pub struct LoadedTelemetry {
    pub series: TimeSeries,
    pub journey: JourneyInformation,
    /// Number of channel records read from the file
    pub records_read: u64,
}

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of an input file from its first bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    if is_json(data) {
        return InputFormat::Json;
    }

    if is_csv(data) {
        return InputFormat::Csv;
    }

    InputFormat::Unknown
}

fn is_json(data: &[u8]) -> bool {
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'{')
}

fn is_csv(data: &[u8]) -> bool {
    let head = &data[..data.len().min(500)];
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        // Sample cut through a multibyte character
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&head[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return false,
    };

    // The header alone names six columns
    text.lines().next().is_some_and(|line| line.matches(',').count() >= 2)
}

/// Load a dataset from a file, auto-detecting format
pub fn load_file(path: &Path) -> Result<LoadedTelemetry> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    match detect_format(&data) {
        InputFormat::Json => load_json(&data),
        InputFormat::Csv => load_csv(&data),
        InputFormat::Unknown => Err(InputError::UnknownFormat.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"  \n{\"temperature\": []}"), InputFormat::Json);
        assert_eq!(detect_format(b"temperature,pressure,speed,x,y,z\n"), InputFormat::Csv);
        assert_eq!(detect_format(b"\x00\x01\x02"), InputFormat::Unknown);
        assert_eq!(detect_format(b""), InputFormat::Unknown);
    }

    #[test]
    fn test_load_file_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "temperature,pressure,speed,x,y,z").unwrap();
        writeln!(file, "70.5,101.2,27000.5,12000,13000,10").unwrap();

        let loaded = load_file(file.path()).unwrap();
        assert_eq!(loaded.series.len(), 1);
        assert_eq!(loaded.series.sample(0).unwrap().temperature, 70.5);
    }

    #[test]
    fn test_load_file_unknown() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        let err = load_file(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "unknown input format");
    }

    #[test]
    fn test_load_file_missing() {
        let err = load_file(Path::new("/nonexistent/journey.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read /nonexistent/journey.json"));
    }

    /// CSV whose 500-byte detection window ends inside a two-byte character
    fn csv_split_at_window() -> Vec<u8> {
        let mut data = b"temperature,pressure,speed,x,y,z,note\n70.5,101.2,27000.5,12000,13000,10,".to_vec();
        data.resize(499, b'a');
        data.extend_from_slice("\u{b0}".as_bytes());
        data.push(b'\n');
        data
    }

    #[test]
    fn test_detect_csv_with_window_ending_mid_character() {
        let data = csv_split_at_window();
        assert_eq!(&data[499..501], "\u{b0}".as_bytes());
        assert_eq!(detect_format(&data), InputFormat::Csv);
        assert_eq!(detect_format(&data[..501]), InputFormat::Csv);
    }

    #[test]
    fn test_detect_rejects_invalid_utf8_inside_window() {
        assert_eq!(detect_format(b"a,b,\xff,c\n"), InputFormat::Unknown);
    }

    #[test]
    fn test_load_file_csv_with_window_ending_mid_character() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&csv_split_at_window()).unwrap();

        let loaded = load_file(file.path()).unwrap();
        assert_eq!(loaded.series.len(), 1);
        assert_eq!(loaded.series.sample(0).unwrap().speed, 27000.5);
    }

    #[cfg(unix)]
    #[test]
    fn test_load_file_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"journey\xff.csv"));
        std::fs::write(&path, "temperature,pressure,speed,x,y,z\n70.5,101.2,27000.5,12000,13000,10\n")
            .unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.series.len(), 1);
    }
}
