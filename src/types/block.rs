use crate::format::LogFormat;
use crate::types::RawReading;

/// One logger flush cycle
///
/// `readings` always holds the full on-disk capacity. Slots past
/// `valid_count` are leftovers from the device buffer; use
/// [`LogBlock::valid_readings`] to get the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBlock {
    pub valid_count: u16,
    /// Readings dropped by the logger before this flush
    pub overrun_count: u16,
    pub readings: Vec<RawReading>,
}

impl LogBlock {
    /// Number of usable readings, `valid_count` clamped to the stored capacity
    pub fn valid_len(&self) -> usize {
        usize::from(self.valid_count).min(self.readings.len())
    }

    pub fn valid_readings(&self) -> &[RawReading] {
        &self.readings[..self.valid_len()]
    }

    pub fn is_count_in_range(&self) -> bool {
        usize::from(self.valid_count) <= self.readings.len()
    }

    pub fn capacity(&self) -> usize {
        self.readings.len()
    }
}

/// A fully decoded log file
#[derive(Debug, Clone, PartialEq)]
pub struct LogStream {
    pub format: LogFormat,
    pub blocks: Vec<LogBlock>,
}

impl LogStream {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            blocks: Vec::new(),
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// All valid readings in file order
    pub fn valid_readings(&self) -> impl Iterator<Item = &RawReading> + '_ {
        self.blocks.iter().flat_map(|block| block.valid_readings())
    }
}
