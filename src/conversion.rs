//! Unit conversion for raw gyroscope counts
//!
//! Raw MPU gyro samples are signed 16-bit counts. Dividing by the
//! sensitivity (LSB per °/s) yields °/s, which is then converted to rad/s.

use crate::types::{LogBlock, LogStream, RawReading};
use std::f64::consts::PI;

/// Convert a raw gyro count to radians per second
pub fn convert_raw_to_rad_per_sec(raw: impl Into<f64>, sensitivity: f64) -> f64 {
    (raw.into() / sensitivity) * (PI / 180.0)
}

/// Convert the gx, gy, gz axes of one reading
pub fn convert_reading(reading: &RawReading, sensitivity: f64) -> [f64; 3] {
    reading
        .gyro()
        .map(|raw| convert_raw_to_rad_per_sec(raw, sensitivity))
}

/// Flat `[gx, gy, gz, gx, gy, gz, ...]` in rad/s for the valid readings of a block
pub fn convert_block(block: &LogBlock, sensitivity: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(block.valid_len() * 3);
    for reading in block.valid_readings() {
        values.extend(convert_reading(reading, sensitivity));
    }
    values
}

/// One converted sequence per block, block boundaries preserved
pub fn convert_stream(stream: &LogStream) -> Vec<Vec<f64>> {
    let sensitivity = stream.format.gyro_sensitivity;
    stream
        .blocks
        .iter()
        .map(|block| convert_block(block, sensitivity))
        .collect()
}
