//! Aggregate statistics and timing analysis for decoded logs
//!
//! Everything here works on the valid slice of each block only. The timing
//! reduction ([`latency_stats`]) takes a plain timestamp slice so it can be
//! used and tested without a decoded stream.

use crate::format::RateSource;
use crate::types::LogStream;
use log::warn;
use std::fmt;

/// Microseconds per second, timestamps are in µs
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Frequency reported when the rate cannot be derived
pub const FREQUENCY_SENTINEL: f64 = 0.0;

/// Divisor used for the average frame latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatencyDivisor {
    /// Number of consecutive timestamp pairs (`n - 1`)
    #[default]
    PairCount,
    /// Total number of valid readings (`n`), matches the legacy converter output
    ReadingCount,
}

/// Options for [`summarize`]
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    pub latency_divisor: LatencyDivisor,
}

/// Running statistics over consecutive timestamp differences
///
/// Differences are signed and not corrected for counter wrap, so a wrap shows
/// up as one large negative latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyStats {
    pub pairs: usize,
    pub sum_us: i64,
    pub min_us: i64,
    pub max_us: i64,
}

impl LatencyStats {
    /// Average latency in µs for `readings` valid readings
    pub fn average_us(&self, readings: usize, divisor: LatencyDivisor) -> f64 {
        let denominator = match divisor {
            LatencyDivisor::PairCount => self.pairs,
            LatencyDivisor::ReadingCount => readings,
        };
        self.sum_us as f64 / denominator as f64
    }
}

/// Reduce an ordered timestamp sequence to latency statistics
///
/// Returns `None` when there are fewer than two timestamps.
pub fn latency_stats(timestamps: &[u32]) -> Option<LatencyStats> {
    timestamps
        .windows(2)
        .map(|pair| i64::from(pair[1]) - i64::from(pair[0]))
        .fold(None, |acc: Option<LatencyStats>, latency| {
            Some(match acc {
                None => LatencyStats {
                    pairs: 1,
                    sum_us: latency,
                    min_us: latency,
                    max_us: latency,
                },
                Some(stats) => LatencyStats {
                    pairs: stats.pairs + 1,
                    sum_us: stats.sum_us + latency,
                    min_us: stats.min_us.min(latency),
                    max_us: stats.max_us.max(latency),
                },
            })
        })
}

/// Timestamps of all valid readings, in block order
pub fn valid_timestamps(stream: &LogStream) -> Vec<u32> {
    stream.valid_readings().map(|r| r.timestamp).collect()
}

/// Convert an average frame latency in µs to Hz
pub fn frequency_from_latency(average_latency_us: f64) -> f64 {
    MICROS_PER_SECOND / average_latency_us
}

/// Non-fatal conditions found while summarizing
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// A block claims more valid readings than it can hold
    OutOfRangeCount {
        block_index: usize,
        valid_count: u16,
        capacity: usize,
    },
    /// Fewer than two valid readings, latency is undefined
    InsufficientData { valid_readings: usize },
    /// Timestamps produced a zero or non-finite rate
    NonFiniteFrequency { average_latency_us: f64 },
    /// The logger dropped readings
    Overruns { total: u64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::OutOfRangeCount {
                block_index,
                valid_count,
                capacity,
            } => write!(
                f,
                "block {block_index} reports {valid_count} valid readings but holds {capacity}, clamped (corrupt block or wrong format variant?)"
            ),
            Advisory::InsufficientData { valid_readings } => write!(
                f,
                "only {valid_readings} valid reading(s), sampling frequency cannot be derived"
            ),
            Advisory::NonFiniteFrequency { average_latency_us } => write!(
                f,
                "average frame latency is {average_latency_us} us, sampling frequency cannot be derived"
            ),
            Advisory::Overruns { total } => write!(
                f,
                "{total} overruns detected. Check logger configuration"
            ),
        }
    }
}

/// Per-block overrun distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverrunBreakdown {
    pub blocks_with_overruns: usize,
    pub max_block_overruns: u16,
}

/// Aggregate view of a decoded log
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub block_count: usize,
    pub total_valid: usize,
    pub total_overruns: u64,
    pub latency: Option<LatencyStats>,
    pub average_latency_us: Option<f64>,
    /// Sampling rate in Hz, [`FREQUENCY_SENTINEL`] when it cannot be derived
    pub frequency_hz: f64,
    /// Present only for formats that request an overrun summary
    pub overrun_breakdown: Option<OverrunBreakdown>,
    pub advisories: Vec<Advisory>,
}

impl Summary {
    /// False when the frequency is the sentinel or otherwise unusable
    pub fn has_valid_frequency(&self) -> bool {
        self.frequency_hz.is_finite() && self.frequency_hz != FREQUENCY_SENTINEL
    }

    /// Recording length implied by reading count and frequency
    pub fn recording_length_secs(&self) -> Option<f64> {
        if self.has_valid_frequency() {
            Some(self.total_valid as f64 / self.frequency_hz)
        } else {
            None
        }
    }

    pub fn has_overruns(&self) -> bool {
        self.total_overruns > 0
    }
}

/// Aggregate counts, timing and rate for a decoded stream
///
/// Advisories are logged with `warn!` as they are found and collected in the
/// returned summary. None of them stop the run.
pub fn summarize(stream: &LogStream, options: &SummaryOptions) -> Summary {
    let mut advisories = Vec::new();
    let mut total_valid = 0usize;
    let mut total_overruns = 0u64;
    let mut breakdown = OverrunBreakdown::default();

    for (block_index, block) in stream.blocks.iter().enumerate() {
        if !block.is_count_in_range() {
            let advisory = Advisory::OutOfRangeCount {
                block_index,
                valid_count: block.valid_count,
                capacity: block.capacity(),
            };
            warn!("{advisory}");
            advisories.push(advisory);
        }

        total_valid += block.valid_len();
        total_overruns += u64::from(block.overrun_count);

        if block.overrun_count > 0 {
            breakdown.blocks_with_overruns += 1;
            breakdown.max_block_overruns = breakdown.max_block_overruns.max(block.overrun_count);
        }
    }

    let timestamps = valid_timestamps(stream);
    let latency = latency_stats(&timestamps);
    let average_latency_us =
        latency.map(|stats| stats.average_us(total_valid, options.latency_divisor));

    if latency.is_none() {
        let advisory = Advisory::InsufficientData {
            valid_readings: total_valid,
        };
        warn!("{advisory}");
        advisories.push(advisory);
    }

    let frequency_hz = match stream.format.rate_source {
        RateSource::Fixed(hz) => hz,
        RateSource::Derived => match average_latency_us {
            Some(avg) => {
                let frequency = frequency_from_latency(avg);
                if frequency.is_finite() {
                    frequency
                } else {
                    let advisory = Advisory::NonFiniteFrequency {
                        average_latency_us: avg,
                    };
                    warn!("{advisory}");
                    advisories.push(advisory);
                    FREQUENCY_SENTINEL
                }
            }
            None => FREQUENCY_SENTINEL,
        },
    };

    if total_overruns > 0 {
        let advisory = Advisory::Overruns {
            total: total_overruns,
        };
        warn!("{advisory}");
        advisories.push(advisory);
    }

    Summary {
        block_count: stream.block_count(),
        total_valid,
        total_overruns,
        latency,
        average_latency_us,
        frequency_hz,
        overrun_breakdown: stream.format.overrun_summary.then_some(breakdown),
        advisories,
    }
}
