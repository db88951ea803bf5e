//! Integration tests for export functionality
//!
//! Tests the export layer across different scenarios:
//! - JSON document shape and content
//! - Destination path defaulting to the source name
//! - Directory creation and overwriting
//! - CSV export of valid readings, kept apart from the JSON file
//! - Error handling for unwritable destinations

mod common;

use common::{encode_block, evenly_spaced};
use imu_log_parser::{
    export_log, export_to_json, parse_imu_file, summarize, ExportOptions, ImuLogError,
    ImuOutput, LogVariant, SummaryOptions,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_sample_log(dir: &Path, name: &str) -> std::path::PathBuf {
    let format = LogVariant::A.format();
    let data = [
        encode_block(&format, 3, 0, &evenly_spaced(3, 0, 2_000, [164, 0, -164])),
        encode_block(&format, 2, 1, &evenly_spaced(2, 6_000, 2_000, [-82, 82, 0])),
    ]
    .concat();
    let path = dir.join(name);
    fs::write(&path, data).expect("Failed to write sample log");
    path
}

#[test]
fn test_export_json_next_to_source() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let source = write_sample_log(temp_dir.path(), "GYRO0001.BIN");

    let log = parse_imu_file(&source, &LogVariant::A.format()).unwrap();
    let summary = summarize(&log, &SummaryOptions::default());
    let report = export_log(&log, &summary, &source, &ExportOptions::default()).unwrap();

    assert_eq!(report.json_path, temp_dir.path().join("GYRO0001.json"));
    assert!(report.csv_path.is_none());

    let content = fs::read_to_string(&report.json_path).expect("Failed to read JSON output");
    let output: ImuOutput = serde_json::from_str(&content).expect("Output should be valid JSON");
    assert!((output.frequency - 500.0).abs() < 1e-9);
    assert_eq!(output.angular_velocity_rad_per_sec.len(), 2);
    assert_eq!(output.angular_velocity_rad_per_sec[0].len(), 9);
    assert_eq!(output.angular_velocity_rad_per_sec[1].len(), 6);

    // Key names are part of the file format
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(value.get("frequency").is_some());
    assert!(value.get("angular_velocity_rad_per_sec").is_some());
}

#[test]
fn test_export_creates_output_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let source = write_sample_log(temp_dir.path(), "GYRO0002.BIN");
    let destination = temp_dir.path().join("nested").join("out").join("result");

    let log = parse_imu_file(&source, &LogVariant::A.format()).unwrap();
    let summary = summarize(&log, &SummaryOptions::default());
    let options = ExportOptions {
        destination: Some(destination.clone()),
        csv: false,
    };
    let report = export_log(&log, &summary, &source, &options).unwrap();

    assert_eq!(report.json_path, destination.with_extension("json"));
    assert!(report.json_path.exists(), "JSON file should be created");
}

#[test]
fn test_export_into_existing_directory_uses_source_name() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let source = write_sample_log(temp_dir.path(), "GYRO0003.BIN");
    let out_dir = temp_dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let log = parse_imu_file(&source, &LogVariant::A.format()).unwrap();
    let summary = summarize(&log, &SummaryOptions::default());
    let options = ExportOptions {
        destination: Some(out_dir.clone()),
        csv: false,
    };
    let report = export_log(&log, &summary, &source, &options).unwrap();

    assert_eq!(report.json_path, out_dir.join("GYRO0003.json"));
}

#[test]
fn test_export_overwrites_existing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("out.json");
    fs::write(&path, "x".repeat(4096)).unwrap();

    let output = ImuOutput {
        frequency: 250.0,
        angular_velocity_rad_per_sec: vec![vec![0.5, -0.5, 0.0]],
    };
    export_to_json(&output, &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        r#"{"frequency":250.0,"angular_velocity_rad_per_sec":[[0.5,-0.5,0.0]]}"#
    );
}

#[test]
fn test_export_to_unwritable_path_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // A regular file cannot act as a parent directory
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();

    let output = ImuOutput {
        frequency: 500.0,
        angular_velocity_rad_per_sec: Vec::new(),
    };
    let result = export_to_json(&output, &blocker.join("out.json"));
    assert!(matches!(result, Err(ImuLogError::OutputWrite { .. })));
}

#[cfg(feature = "csv")]
#[test]
fn test_export_csv_rows_for_valid_readings() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let source = write_sample_log(temp_dir.path(), "GYRO0004.BIN");

    let log = parse_imu_file(&source, &LogVariant::A.format()).unwrap();
    let summary = summarize(&log, &SummaryOptions::default());
    let options = ExportOptions {
        destination: None,
        csv: true,
    };
    let report = export_log(&log, &summary, &source, &options).unwrap();

    let csv_path = report.csv_path.expect("CSV path should be reported");
    assert_eq!(csv_path, temp_dir.path().join("GYRO0004.csv"));

    let content = fs::read_to_string(&csv_path).expect("Failed to read CSV output");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "block,index,timestamp_us,gx_rad_s,gy_rad_s,gz_rad_s");
    // 3 + 2 valid readings, filler slots excluded
    assert_eq!(lines.len(), 6);
    assert!(lines[4].starts_with("1,0,6000,"));
    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), 6, "Row has wrong field count: {line}");
    }
}

#[cfg(feature = "csv")]
#[test]
fn test_export_csv_destination_keeps_json_intact() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let source = write_sample_log(temp_dir.path(), "GYRO0005.BIN");

    let log = parse_imu_file(&source, &LogVariant::A.format()).unwrap();
    let summary = summarize(&log, &SummaryOptions::default());
    let options = ExportOptions {
        destination: Some(temp_dir.path().join("gyro.csv")),
        csv: true,
    };
    let report = export_log(&log, &summary, &source, &options).unwrap();

    assert_eq!(report.json_path, temp_dir.path().join("gyro.csv"));
    let csv_path = report.csv_path.expect("CSV path should be reported");
    assert_eq!(csv_path, temp_dir.path().join("gyro.readings.csv"));

    let json = fs::read_to_string(&report.json_path).expect("Failed to read JSON output");
    let document: ImuOutput = serde_json::from_str(&json).expect("JSON output was overwritten");
    assert!((document.frequency - 500.0).abs() < 1e-9);
    assert_eq!(document.angular_velocity_rad_per_sec.len(), 2);

    let content = fs::read_to_string(&csv_path).expect("Failed to read CSV output");
    assert!(content.starts_with("block,index,timestamp_us"));
    assert_eq!(content.lines().count(), 6);
}
