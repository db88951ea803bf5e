//! Export functionality for decoded IMU logs
//!
//! Builds the output document and writes it as JSON, plus an optional
//! per-reading CSV. Files are written in full and synced before the
//! export functions return, so callers can report success afterwards.

use crate::conversion::convert_stream;
use crate::error::{ImuLogError, Result};
use crate::stats::Summary;
use crate::types::LogStream;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extension used when the destination does not name one
pub const DEFAULT_OUTPUT_EXTENSION: &str = "json";

/// The converted output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImuOutput {
    /// Sampling rate in Hz, 0 when it could not be derived
    pub frequency: f64,
    /// gx, gy, gz in rad/s for each valid reading, one sequence per block
    pub angular_velocity_rad_per_sec: Vec<Vec<f64>>,
}

/// Export options for controlling output files
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Destination file or directory, defaults to next to the source
    pub destination: Option<PathBuf>,
    /// Also write a per-reading CSV next to the JSON file
    pub csv: bool,
}

/// Paths written by [`export_log`]
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub json_path: PathBuf,
    pub csv_path: Option<PathBuf>,
}

/// Assemble the output document from a decoded stream and its summary
pub fn build_output(stream: &LogStream, summary: &Summary) -> ImuOutput {
    ImuOutput {
        frequency: summary.frequency_hz,
        angular_velocity_rad_per_sec: convert_stream(stream),
    }
}

/// Resolve the JSON output path
///
/// The destination supplies the directory, base name and extension; any part
/// it leaves out falls back to the source's directory, the source's base name
/// and `.json`. A destination that is an existing directory (or ends with a
/// path separator) only supplies the directory.
pub fn compute_output_path(source: &Path, destination: Option<&Path>) -> PathBuf {
    let source_stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("imu");
    let source_dir = source.parent().unwrap_or(Path::new(""));

    let Some(destination) = destination else {
        return source_dir.join(format!("{source_stem}.{DEFAULT_OUTPUT_EXTENSION}"));
    };

    let names_directory = destination.is_dir()
        || destination
            .to_str()
            .map(|s| s.ends_with(std::path::MAIN_SEPARATOR) || s.ends_with('/'))
            .unwrap_or(false);
    if names_directory {
        return destination.join(format!("{source_stem}.{DEFAULT_OUTPUT_EXTENSION}"));
    }

    let dir = destination.parent().unwrap_or(Path::new(""));
    let name = destination
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(source_stem);
    let ext = destination
        .extension()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_OUTPUT_EXTENSION);

    dir.join(format!("{name}.{ext}"))
}

fn with_index_suffix(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("imu");
    let file_name = match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{stem}.{index:02}.{ext}"),
        None => format!("{stem}.{index:02}"),
    };
    path.with_file_name(file_name)
}

/// Resolve one output path per source, keeping every path distinct
///
/// Sources that resolve to the same file (same base name under a shared
/// destination directory) get a `.NN` suffix on the base name, numbered from
/// 01 in source order.
pub fn compute_output_paths(sources: &[PathBuf], destination: Option<&Path>) -> Vec<PathBuf> {
    let resolved: Vec<PathBuf> = sources
        .iter()
        .map(|source| compute_output_path(source, destination))
        .collect();

    let mut counts: HashMap<&Path, usize> = HashMap::new();
    for path in &resolved {
        *counts.entry(path.as_path()).or_default() += 1;
    }

    let mut taken: HashSet<PathBuf> = resolved.iter().cloned().collect();
    let mut next_index: HashMap<&Path, usize> = HashMap::new();
    let mut output_paths = Vec::with_capacity(resolved.len());

    for path in &resolved {
        if counts[path.as_path()] < 2 {
            output_paths.push(path.clone());
            continue;
        }
        let index = next_index.entry(path.as_path()).or_default();
        loop {
            *index += 1;
            let candidate = with_index_suffix(path, *index);
            if taken.insert(candidate.clone()) {
                output_paths.push(candidate);
                break;
            }
        }
    }

    output_paths
}

fn create_output_file(output_path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ImuLogError::output_write(output_path, e))?;
        }
    }

    let file =
        File::create(output_path).map_err(|e| ImuLogError::output_write(output_path, e))?;
    Ok(BufWriter::new(file))
}

fn finish_output_file(writer: BufWriter<File>, output_path: &Path) -> Result<()> {
    let file = writer
        .into_inner()
        .map_err(|e| ImuLogError::output_write(output_path, e.into_error()))?;
    file.sync_all()
        .map_err(|e| ImuLogError::output_write(output_path, e))
}

/// Write the output document as JSON, overwriting any existing file
pub fn export_to_json(output: &ImuOutput, output_path: &Path) -> Result<()> {
    let mut writer = create_output_file(output_path)?;
    serde_json::to_writer(&mut writer, output).map_err(|e| {
        if e.is_io() {
            ImuLogError::output_write(output_path, e.into())
        } else {
            ImuLogError::Serialize(e)
        }
    })?;
    writer
        .flush()
        .map_err(|e| ImuLogError::output_write(output_path, e))?;
    finish_output_file(writer, output_path)
}

/// Write one CSV row per valid reading
#[cfg(feature = "csv")]
pub fn export_to_csv(stream: &LogStream, output_path: &Path) -> Result<()> {
    use crate::conversion::convert_reading;

    let csv_error = |e: csv::Error| ImuLogError::output_write(output_path, e.into());

    let writer = create_output_file(output_path)?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "block",
            "index",
            "timestamp_us",
            "gx_rad_s",
            "gy_rad_s",
            "gz_rad_s",
        ])
        .map_err(csv_error)?;

    let sensitivity = stream.format.gyro_sensitivity;
    for (block_index, block) in stream.blocks.iter().enumerate() {
        for (index, reading) in block.valid_readings().iter().enumerate() {
            let [gx, gy, gz] = convert_reading(reading, sensitivity);
            csv_writer
                .write_record(&[
                    block_index.to_string(),
                    index.to_string(),
                    reading.timestamp.to_string(),
                    gx.to_string(),
                    gy.to_string(),
                    gz.to_string(),
                ])
                .map_err(csv_error)?;
        }
    }

    let writer = csv_writer
        .into_inner()
        .map_err(|e| ImuLogError::output_write(output_path, e.into_error()))?;
    finish_output_file(writer, output_path)
}

#[cfg(feature = "csv")]
fn export_csv_if_requested(
    stream: &LogStream,
    json_path: &Path,
    options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    if !options.csv {
        return Ok(None);
    }
    let mut csv_path = json_path.with_extension("csv");
    if csv_path == json_path {
        let stem = json_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("imu");
        csv_path = json_path.with_file_name(format!("{stem}.readings.csv"));
    }
    export_to_csv(stream, &csv_path)?;
    Ok(Some(csv_path))
}

#[cfg(not(feature = "csv"))]
fn export_csv_if_requested(
    _stream: &LogStream,
    _json_path: &Path,
    _options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    Ok(None)
}

/// Build the document for a decoded log and write every requested file
pub fn export_log(
    stream: &LogStream,
    summary: &Summary,
    source: &Path,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let json_path = compute_output_path(source, options.destination.as_deref());
    export_to_json(&build_output(stream, summary), &json_path)?;
    let csv_path = export_csv_if_requested(stream, &json_path, options)?;

    Ok(ExportReport {
        json_path,
        csv_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_defaults_to_source_name() {
        let path = compute_output_path(Path::new("logs/FLIGHT01.BIN"), None);
        assert_eq!(path, PathBuf::from("logs/FLIGHT01.json"));
    }

    #[test]
    fn test_output_path_keeps_destination_name_and_extension() {
        let path = compute_output_path(
            Path::new("logs/FLIGHT01.BIN"),
            Some(Path::new("out/gyro.txt")),
        );
        assert_eq!(path, PathBuf::from("out/gyro.txt"));
    }

    #[test]
    fn test_output_path_forces_json_extension() {
        let path = compute_output_path(Path::new("FLIGHT01.BIN"), Some(Path::new("out/gyro")));
        assert_eq!(path, PathBuf::from("out/gyro.json"));
    }

    #[test]
    fn test_output_path_trailing_separator_is_directory() {
        let path = compute_output_path(Path::new("in/FLIGHT01.BIN"), Some(Path::new("out/")));
        assert_eq!(path, PathBuf::from("out/FLIGHT01.json"));
    }

    #[test]
    fn test_output_path_bare_name_in_working_directory() {
        let path = compute_output_path(Path::new("in/FLIGHT01.BIN"), Some(Path::new("gyro")));
        assert_eq!(path, PathBuf::from("gyro.json"));
    }

    #[test]
    fn test_output_paths_distinct_stems_unchanged() {
        let sources = vec![PathBuf::from("a/LOG00001.BIN"), PathBuf::from("a/LOG00002.BIN")];
        let paths = compute_output_paths(&sources, Some(Path::new("out/")));
        assert_eq!(
            paths,
            vec![PathBuf::from("out/LOG00001.json"), PathBuf::from("out/LOG00002.json")]
        );
    }

    #[test]
    fn test_output_paths_same_stem_get_index_suffix() {
        let sources = vec![
            PathBuf::from("a/LOG00001.BIN"),
            PathBuf::from("b/LOG00002.BIN"),
            PathBuf::from("b/LOG00001.BIN"),
        ];
        let paths = compute_output_paths(&sources, Some(Path::new("out/")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/LOG00001.01.json"),
                PathBuf::from("out/LOG00002.json"),
                PathBuf::from("out/LOG00001.02.json"),
            ]
        );
    }

    #[test]
    fn test_output_paths_suffix_skips_names_already_taken() {
        let sources = vec![
            PathBuf::from("a/LOG.BIN"),
            PathBuf::from("b/LOG.BIN"),
            PathBuf::from("c/LOG.01.BIN"),
        ];
        let paths = compute_output_paths(&sources, Some(Path::new("out/")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/LOG.02.json"),
                PathBuf::from("out/LOG.03.json"),
                PathBuf::from("out/LOG.01.json"),
            ]
        );
    }
}
