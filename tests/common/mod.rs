//! Helpers for building binary logs in tests

#![allow(dead_code)]

use imu_log_parser::{LogFormat, RawReading};

/// Encode one block exactly as the logger writes it
///
/// Slots past `readings.len()` are filled with non-zero filler so tests notice
/// if anything reads beyond the valid count.
pub fn encode_block(
    format: &LogFormat,
    valid_count: u16,
    overruns: u16,
    readings: &[RawReading],
) -> Vec<u8> {
    let filler = RawReading {
        timestamp: 0xFFFF_FFF0,
        accel: format.has_accel.then_some([0x7777; 3]),
        gx: 0x7777,
        gy: 0x7777,
        gz: 0x7777,
    };

    let mut out = Vec::with_capacity(format.block_size());
    out.extend_from_slice(&valid_count.to_le_bytes());
    out.extend_from_slice(&overruns.to_le_bytes());
    for i in 0..format.capacity {
        let r = readings.get(i).copied().unwrap_or(filler);
        out.extend_from_slice(&r.timestamp.to_le_bytes());
        if format.has_accel {
            for axis in r.accel.unwrap_or_default() {
                out.extend_from_slice(&axis.to_le_bytes());
            }
        }
        for axis in r.gyro() {
            out.extend_from_slice(&axis.to_le_bytes());
        }
    }
    out.resize(format.block_size(), 0xEE);
    out
}

/// `count` readings spaced `step_us` apart starting at `start_us`
pub fn evenly_spaced(count: u32, start_us: u32, step_us: u32, gyro: [i16; 3]) -> Vec<RawReading> {
    (0..count)
        .map(|i| RawReading::new(start_us + i * step_us, gyro[0], gyro[1], gyro[2]))
        .collect()
}
