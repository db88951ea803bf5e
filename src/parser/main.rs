use crate::error::{ImuLogError, Result};
use crate::format::LogFormat;
use crate::parser::decoder::decode_log_stream;
use crate::types::LogStream;
use log::debug;
use std::path::Path;

/// Read a log file into memory and decode it
pub fn parse_imu_file(file_path: &Path, format: &LogFormat) -> Result<LogStream> {
    let data = std::fs::read(file_path).map_err(|source| ImuLogError::InputRead {
        path: file_path.to_path_buf(),
        source,
    })?;

    debug!(
        "Read {} bytes ({:.2} KB) from {:?}",
        data.len(),
        data.len() as f64 / 1024.0,
        file_path
    );

    parse_imu_bytes(&data, format)
}

/// Decode a log held in memory
pub fn parse_imu_bytes(data: &[u8], format: &LogFormat) -> Result<LogStream> {
    debug!(
        "Decoding {} bytes as variant {} ({} byte blocks, capacity {}, {} pad bytes)",
        data.len(),
        format.variant,
        format.block_size(),
        format.capacity,
        format.pad_bytes
    );

    let log = decode_log_stream(data, format)?;

    debug!("Decoded {} blocks", log.block_count());
    Ok(log)
}
