use crate::error::{ImuLogError, Result};
use crate::format::LogFormat;
use crate::parser::stream::ImuDataStream;
use crate::types::{LogBlock, LogStream, RawReading};

/// Decode one reading at the cursor
pub fn decode_reading(stream: &mut ImuDataStream, format: &LogFormat) -> Result<RawReading> {
    let timestamp = stream.read_u32_le()?;

    let accel = if format.has_accel {
        Some([
            stream.read_i16_le()?,
            stream.read_i16_le()?,
            stream.read_i16_le()?,
        ])
    } else {
        None
    };

    Ok(RawReading {
        timestamp,
        accel,
        gx: stream.read_i16_le()?,
        gy: stream.read_i16_le()?,
        gz: stream.read_i16_le()?,
    })
}

/// Decode one block at the cursor
///
/// All `capacity` readings are read regardless of `valid_count`, and the
/// trailing pad bytes are skipped. `valid_count` is passed through unchecked.
pub fn decode_block(stream: &mut ImuDataStream, format: &LogFormat) -> Result<LogBlock> {
    let valid_count = stream.read_u16_le()?;
    let overrun_count = stream.read_u16_le()?;

    let mut readings = Vec::with_capacity(format.capacity);
    for _ in 0..format.capacity {
        readings.push(decode_reading(stream, format)?);
    }

    stream.skip(format.pad_bytes)?;

    Ok(LogBlock {
        valid_count,
        overrun_count,
        readings,
    })
}

/// Decode a whole buffer into blocks
///
/// The buffer must end exactly on a block boundary.
pub fn decode_log_stream(data: &[u8], format: &LogFormat) -> Result<LogStream> {
    format.validate()?;

    let block_size = format.block_size();
    let mut stream = ImuDataStream::new(data);
    let mut log = LogStream::new(format.clone());
    log.blocks.reserve(data.len() / block_size);

    while !stream.is_eof() {
        let remaining = stream.remaining();
        if remaining < block_size {
            return Err(ImuLogError::TruncatedBlock {
                offset: stream.pos,
                remaining,
                block_size,
            });
        }
        log.blocks.push(decode_block(&mut stream, format)?);
    }

    Ok(log)
}
