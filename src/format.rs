//! Log format descriptors
//!
//! The logger firmware went through several revisions that all write the same
//! little-endian block layout with different constants. A [`LogFormat`] captures
//! those constants so a single decoder handles every revision.

use crate::error::{ImuLogError, Result};
use std::fmt;
use std::str::FromStr;

/// Size of the `valid_count` + `overrun_count` block header in bytes
pub const BLOCK_HEADER_BYTES: usize = 4;

/// Size of the reading timestamp in bytes
pub const TIMESTAMP_BYTES: usize = 4;

/// Size of a single axis sample in bytes
pub const AXIS_BYTES: usize = 2;

/// Fixed rate written by logger revision B, in Hz
pub const FIXED_RATE_HZ: f64 = 500.0;

/// Gyroscope full-scale range as configured through FS_SEL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroFullScale {
    Deg250,
    Deg500,
    Deg1000,
    Deg2000,
}

impl GyroFullScale {
    /// Sensitivity in LSB per degree/second
    pub const fn sensitivity(self) -> f64 {
        match self {
            Self::Deg250 => 131.0,
            Self::Deg500 => 65.5,
            Self::Deg1000 => 32.8,
            Self::Deg2000 => 16.4,
        }
    }

    /// Map a range in degrees/second (250, 500, 1000, 2000) to its setting
    pub fn from_range_dps(range: u32) -> Option<Self> {
        match range {
            250 => Some(Self::Deg250),
            500 => Some(Self::Deg500),
            1000 => Some(Self::Deg1000),
            2000 => Some(Self::Deg2000),
            _ => None,
        }
    }
}

/// Where the output sampling frequency comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateSource {
    /// Computed from the spacing of valid timestamps
    Derived,
    /// Declared by the logger configuration, in Hz
    Fixed(f64),
}

/// Logger firmware revisions with known block layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogVariant {
    A,
    B,
    C,
}

impl LogVariant {
    pub fn format(self) -> LogFormat {
        match self {
            LogVariant::A => LogFormat {
                variant: self,
                capacity: 50,
                pad_bytes: 8,
                has_accel: false,
                rate_source: RateSource::Derived,
                overrun_summary: false,
                gyro_sensitivity: GyroFullScale::Deg2000.sensitivity(),
            },
            LogVariant::B => LogFormat {
                variant: self,
                capacity: 31,
                pad_bytes: 12,
                has_accel: true,
                rate_source: RateSource::Fixed(FIXED_RATE_HZ),
                overrun_summary: false,
                gyro_sensitivity: GyroFullScale::Deg2000.sensitivity(),
            },
            LogVariant::C => LogFormat {
                variant: self,
                capacity: 31,
                pad_bytes: 12,
                has_accel: true,
                rate_source: RateSource::Derived,
                overrun_summary: true,
                gyro_sensitivity: GyroFullScale::Deg2000.sensitivity(),
            },
        }
    }
}

impl fmt::Display for LogVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogVariant::A => "A",
            LogVariant::B => "B",
            LogVariant::C => "C",
        };
        f.write_str(name)
    }
}

impl FromStr for LogVariant {
    type Err = ImuLogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(LogVariant::A),
            "b" => Ok(LogVariant::B),
            "c" => Ok(LogVariant::C),
            other => Err(ImuLogError::invalid_format(format!(
                "unknown variant '{other}', expected one of: a, b, c"
            ))),
        }
    }
}

/// Block layout and interpretation constants for one logger revision
#[derive(Debug, Clone, PartialEq)]
pub struct LogFormat {
    pub variant: LogVariant,
    /// Readings stored per block, valid or not
    pub capacity: usize,
    /// Reserved bytes after the readings array
    pub pad_bytes: usize,
    /// Readings carry ax, ay, az before the gyro axes
    pub has_accel: bool,
    pub rate_source: RateSource,
    /// Report per-block overrun breakdown in the summary
    pub overrun_summary: bool,
    /// LSB per degree/second
    pub gyro_sensitivity: f64,
}

impl LogFormat {
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.gyro_sensitivity = sensitivity;
        self
    }

    pub fn axis_count(&self) -> usize {
        if self.has_accel {
            6
        } else {
            3
        }
    }

    pub fn reading_size(&self) -> usize {
        TIMESTAMP_BYTES + self.axis_count() * AXIS_BYTES
    }

    pub fn block_size(&self) -> usize {
        BLOCK_HEADER_BYTES + self.capacity * self.reading_size() + self.pad_bytes
    }

    /// Reject descriptors that would make decoding or conversion meaningless
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ImuLogError::invalid_format("block capacity must be non-zero"));
        }
        if !self.gyro_sensitivity.is_finite() || self.gyro_sensitivity <= 0.0 {
            return Err(ImuLogError::invalid_format(format!(
                "gyro sensitivity must be positive, got {}",
                self.gyro_sensitivity
            )));
        }
        if let RateSource::Fixed(hz) = self.rate_source {
            if !hz.is_finite() || hz <= 0.0 {
                return Err(ImuLogError::invalid_format(format!(
                    "fixed rate must be positive, got {hz}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        LogVariant::A.format()
    }
}
