//! IMU Log Parser Library
//!
//! A Rust library for decoding the block-structured binary logs written by
//! MPU gyro data loggers, summarizing their timing quality and converting the
//! angular velocity samples to rad/s.
//!
//! # Features
//!
//! - **`csv`** (default): Enable per-reading CSV export
//! - **`cli`** (default): Build the command-line interface binary
//!
//! # Quick Start
//!
//! Decode a log file and write the JSON document next to it:
//! ```rust,no_run
//! use imu_log_parser::{export_log, parse_imu_file, summarize, ExportOptions, LogVariant, SummaryOptions};
//! use std::path::Path;
//!
//! let source = Path::new("GYRO0001.BIN");
//! let log = parse_imu_file(source, &LogVariant::A.format()).unwrap();
//! let summary = summarize(&log, &SummaryOptions::default());
//! println!("{} readings at {:.1} Hz", summary.total_valid, summary.frequency_hz);
//!
//! let report = export_log(&log, &summary, source, &ExportOptions::default()).unwrap();
//! println!("Written to {}", report.json_path.display());
//! ```
//!
//! # Public API
//!
//! ## Decoding
//! - [`parse_imu_file`] - Read and decode a log file
//! - [`parse_imu_bytes`] - Decode a log held in memory
//! - [`decode_log_stream`] - Block decoder for a given [`LogFormat`]
//!
//! ## Formats
//! - [`LogVariant`] - Known logger revisions (A, B, C)
//! - [`LogFormat`] - Block layout, rate source and gyro sensitivity
//! - [`GyroFullScale`] - Standard gyro sensitivities
//!
//! ## Analysis
//! - [`summarize`] - Counts, overruns, latency and sampling frequency
//! - [`latency_stats`] - Timing reduction over a timestamp sequence
//! - [`convert_raw_to_rad_per_sec`] - Raw count to rad/s
//!
//! ## Export
//! - [`build_output`] - Assemble the output document
//! - [`export_log`] - Write JSON (and optionally CSV) output
//! - [`compute_output_path`] - Destination path resolution

// Module declarations
pub mod conversion;
pub mod error;
pub mod export;
pub mod format;
pub mod parser;
pub mod stats;
pub mod types;

pub use conversion::*;
pub use error::*;
pub use export::*;
pub use format::*;
pub use parser::*;
pub use stats::*;
pub use types::*;
