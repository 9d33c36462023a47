use serde::{Deserialize, Serialize};

/// Significant digits shown for temperature readings
pub const TEMPERATURE_PRECISION: usize = 4;
/// Significant digits shown for pressure readings
pub const PRESSURE_PRECISION: usize = 4;
/// Significant digits shown for speed readings
pub const SPEED_PRECISION: usize = 7;

/// Enough digits to print any f64 exactly
const EXACT_DIGITS: usize = 800;

/// A 3-D position reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x_coordinate: f64,
    pub y_coordinate: f64,
    pub z_coordinate: f64,
}

impl Location {
    pub fn new(x_coordinate: f64, y_coordinate: f64, z_coordinate: f64) -> Self {
        Self { x_coordinate, y_coordinate, z_coordinate }
    }
}

/// A channel value together with the text shown for it
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Stored value, untouched by formatting
    pub value: f64,
    /// Value rounded to the channel's significant digits
    pub text: String,
}

impl Reading {
    pub fn with_precision(value: f64, precision: usize) -> Self {
        Self {
            value,
            text: to_precision(value, precision),
        }
    }
}

/// The values shown by the renderers at a given instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySample {
    pub temperature: Option<Reading>,
    pub pressure: Option<Reading>,
    pub speed: Option<Reading>,
    pub location: Location,
    /// Cursor value after the sample was read
    pub index: usize,
}

/// Format a number with `precision` significant digits.
///
/// Uses fixed notation unless the decimal exponent is below -6 or at least
/// `precision`, in which case the result looks like `1.235e+5`.
pub fn to_precision(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let precision = precision.clamp(1, 100);
    let sign = if value < 0.0 { "-" } else { "" };

    // Exact decimal expansion; no f64 needs more significant digits than this
    let exact = format!("{:.*e}", EXACT_DIGITS, value.abs());
    let (mantissa, exponent) = match exact.split_once('e') {
        Some(parts) => parts,
        None => return exact,
    };
    let mut exponent: i32 = exponent.parse().unwrap_or(0);
    let all_digits: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();

    // Ties round away from zero
    let mut digits = all_digits[..precision].to_vec();
    if all_digits[precision] >= b'5' && !round_up(&mut digits) {
        digits.insert(0, b'1');
        digits.truncate(precision);
        exponent += 1;
    }
    let digits = String::from_utf8(digits).unwrap_or_default();

    if exponent < -6 || exponent >= precision as i32 {
        let (lead, rest) = digits.split_at(1);
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        let mantissa = if rest.is_empty() {
            lead.to_string()
        } else {
            format!("{}.{}", lead, rest)
        };
        return format!("{}{}e{}{}", sign, mantissa, exp_sign, exponent.abs());
    }

    let text = if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("0.{}{}", zeros, digits)
    } else {
        let split = exponent as usize + 1;
        let (int_part, frac_part) = digits.split_at(split);
        if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{}.{}", int_part, frac_part)
        }
    };

    format!("{}{}", sign, text)
}

/// Add one to a decimal digit string; false when it carried out of the top
fn round_up(digits: &mut [u8]) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return true;
        }
    }
    false
}
