//! Decoding of the 6-byte HID input report sent by USB postal scales.
//!
//! Layout: `[status, unused, unit, exponent, magnitude_lo, magnitude_hi]`.

use super::DecodeError;
use crate::models::reading::{LB_PER_KG, WeightReading};

pub const REPORT_LEN: usize = 6;

/// Unit code reported when the scale is set to pounds.
const UNIT_POUNDS: u8 = 0x0C;

pub fn decode(raw: &[u8]) -> Result<WeightReading, DecodeError> {
    let [_status, _, unit, exp, lo, hi]: [u8; REPORT_LEN] =
        raw.try_into().map_err(|_| DecodeError::Length {
            expected: REPORT_LEN,
            actual: raw.len(),
        })?;

    let exponent = exp as i8 as i32;
    let magnitude = u16::from_le_bytes([lo, hi]) as f64;
    let value = magnitude * 10f64.powi(exponent);

    let reading = if unit == UNIT_POUNDS {
        WeightReading {
            kilograms: value / LB_PER_KG,
            pounds: value,
        }
    } else {
        WeightReading {
            kilograms: value,
            pounds: value * LB_PER_KG,
        }
    };

    Ok(reading)
}
