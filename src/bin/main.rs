//! CLI binary for IMU Log Parser
//!
//! This provides the command-line interface for the IMU log parser library.

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use glob::glob;
use imu_log_parser::{
    compute_output_path, compute_output_paths, export_log, parse_imu_file, summarize,
    ExportOptions, GyroFullScale, LatencyDivisor, LogFormat, LogVariant, Summary, SummaryOptions,
};
use std::path::{Path, PathBuf};

fn version() -> String {
    format!(
        "{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown")
    )
}

fn build_command() -> Command {
    Command::new("IMU Log Parser")
        .version(version())
        .about("Decode MPU gyro logger binaries. Output angular velocity in rad/s as JSON.")
        .arg(
            Arg::new("files")
                .help("Binary log files to decode (supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Destination file or directory (default: source name with .json, next to the source)")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Logger format variant: a (50 readings, derived rate), b (31 readings with accel, fixed 500 Hz), c (31 readings with accel, derived rate)")
                .value_name("VARIANT")
                .default_value("a"),
        )
        .arg(
            Arg::new("gyro-range")
                .long("gyro-range")
                .help("Gyro full-scale range in °/s: 250, 500, 1000 or 2000")
                .value_name("DPS")
                .value_parser(clap::value_parser!(u32))
                .conflicts_with("sensitivity"),
        )
        .arg(
            Arg::new("sensitivity")
                .long("sensitivity")
                .help("Gyro sensitivity in LSB per °/s (default: 16.4)")
                .value_name("LSB")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("legacy-latency")
                .long("legacy-latency")
                .help("Average frame latency over the reading count instead of the pair count, matching older converter output")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Also export one CSV row per valid reading next to the JSON file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed decoding information")
                .action(clap::ArgAction::SetTrue),
        )
}

fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn resolve_format(matches: &ArgMatches) -> Result<LogFormat> {
    let variant: LogVariant = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("a")
        .parse()?;
    let mut format = variant.format();

    if let Some(&range) = matches.get_one::<u32>("gyro-range") {
        let scale = GyroFullScale::from_range_dps(range)
            .ok_or_else(|| anyhow!("Unsupported gyro range {range}, expected 250, 500, 1000 or 2000"))?;
        format = format.with_sensitivity(scale.sensitivity());
    }
    if let Some(&sensitivity) = matches.get_one::<f64>("sensitivity") {
        format = format.with_sensitivity(sensitivity);
    }

    format.validate()?;
    Ok(format)
}

fn expand_patterns(patterns: &[&String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if !(pattern.contains('*') || pattern.contains('?')) {
            paths.push(PathBuf::from(pattern.as_str()));
            continue;
        }

        match glob(pattern) {
            Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                Ok(matched) => {
                    log::debug!("Glob pattern '{pattern}' matched {} files", matched.len());
                    paths.extend(matched);
                }
                Err(e) => eprintln!("Error expanding glob pattern '{pattern}': {e}"),
            },
            Err(e) => eprintln!("Invalid glob pattern '{pattern}': {e}"),
        }
    }

    paths
}

fn print_summary(summary: &Summary) {
    println!(
        "blocks: {}, valid readings: {}",
        summary.block_count, summary.total_valid
    );

    match summary.recording_length_secs() {
        Some(length) => println!("length: {length:.3} sec"),
        None => println!("length: unknown"),
    }

    match (summary.latency, summary.average_latency_us) {
        (Some(latency), Some(avg)) => println!(
            "latency: avg {avg:.2} us, min {} us, max {} us",
            latency.min_us, latency.max_us
        ),
        _ => println!("latency: n/a"),
    }

    if summary.has_valid_frequency() {
        println!("avg frequency: {:.3} Hz", summary.frequency_hz);
    } else {
        println!("avg frequency: insufficient data");
    }

    if let Some(breakdown) = summary.overrun_breakdown {
        println!(
            "overruns: {} total in {} block(s), max {} in one block",
            summary.total_overruns, breakdown.blocks_with_overruns, breakdown.max_block_overruns
        );
    }
}

fn process_file(
    path: &Path,
    format: &LogFormat,
    summary_options: &SummaryOptions,
    export_options: &ExportOptions,
) -> Result<()> {
    println!("Reading raw data from {}", path.display());

    let log = parse_imu_file(path, format)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let summary = summarize(&log, summary_options);
    print_summary(&summary);

    let report = export_log(&log, &summary, path, export_options)
        .with_context(|| format!("Failed to export {}", path.display()))?;

    println!("Successfully written to {}", report.json_path.display());
    if let Some(csv_path) = report.csv_path {
        println!("Exported readings to: {}", csv_path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let format = resolve_format(&matches)?;
    let summary_options = SummaryOptions {
        latency_divisor: if matches.get_flag("legacy-latency") {
            LatencyDivisor::ReadingCount
        } else {
            LatencyDivisor::PairCount
        },
    };

    let patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();
    let paths = expand_patterns(&patterns);

    if paths.is_empty() {
        eprintln!("Error: No files found to process.");
        eprintln!("Input patterns were: {patterns:?}");
        std::process::exit(1);
    }

    let mut destination = matches.get_one::<String>("output").map(PathBuf::from);
    if paths.len() > 1 {
        // One output per source: only the directory part of the destination applies
        destination = destination.map(|dest| {
            if dest.is_dir() || dest.extension().is_none() {
                dest
            } else {
                dest.parent().map(Path::to_path_buf).unwrap_or_default()
            }
        });
        if let Some(dir) = destination.as_mut() {
            if dir.as_os_str().is_empty() {
                *dir = PathBuf::from(".");
            }
            std::fs::create_dir_all(&*dir)
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }
    }

    let csv = matches.get_flag("csv");
    let output_paths = compute_output_paths(&paths, destination.as_deref());

    log::debug!("Format: {format:?}");

    let mut processed_files = 0;
    for (index, (path, output_path)) in paths.iter().zip(&output_paths).enumerate() {
        if index > 0 {
            println!();
        }

        if *output_path != compute_output_path(path, destination.as_deref()) {
            log::warn!(
                "Another source has the same base name as {}, writing {}",
                path.display(),
                output_path.display()
            );
        }
        let export_options = ExportOptions {
            destination: Some(output_path.clone()),
            csv,
        };

        match process_file(path, &format, &summary_options, &export_options) {
            Ok(()) => processed_files += 1,
            Err(e) => eprintln!("Error: {e:#}"),
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            paths.len()
        );
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}
