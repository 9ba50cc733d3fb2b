// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Morphology Conversion Tool
//!
//! Converts SWC morphology files into a structured JSON document (`<stem>.json`) and a flat
//! float32 record buffer (`<stem>.bin`) written next to each input.
//!
//! Usage:
//!   cargo run --bin neuromorph-convert -- [OPTIONS] <INPUT>...
//!
//! Example:
//!   cargo run --bin neuromorph-convert -- --recenter --debug-neuromorph-io cells/*.swc

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::{error, info};

use neuromorph::config::{load_config, FailurePolicy};
use neuromorph::io::{convert_batch, ConversionOptions, DefaultLoader};
#[cfg(feature = "file-logging")]
use neuromorph::observability::init_logging_with_file;
use neuromorph::observability::{
    debug_flags_help, init_logging, is_debug_flag, parse_debug_flags, CrateDebugFlags,
    LoggingGuard,
};

/// Export neuronal morphologies to JSON and float32 binary buffers
#[derive(Parser, Debug)]
#[command(name = "neuromorph-convert", version, author, long_about = None)]
struct Args {
    /// Morphology files to convert
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Path to a neuromorph.toml configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Translate each morphology so the soma center sits at the origin
    #[arg(long, default_value_t = false)]
    recenter: bool,

    /// Write only the JSON document
    #[arg(long, default_value_t = false)]
    json_only: bool,

    /// Fixed soma radius written to both outputs
    #[arg(long)]
    soma_radius: Option<f32>,

    /// Derive the soma radius from the mean distance of soma points to their center
    #[arg(long, default_value_t = false)]
    mean_soma_radius: bool,

    /// Include the soma center in the JSON soma object
    #[arg(long, default_value_t = false)]
    soma_center: bool,

    /// Stop at the first input that fails to convert
    #[arg(long, default_value_t = false)]
    abort_on_error: bool,

    /// Also write logs to `neuromorph.log` in this directory (needs the file-logging feature)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    /// Flags set on the command line, keyed the way the config loader expects
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if self.recenter {
            overrides.insert("recenter".to_string(), "true".to_string());
        }
        if self.json_only {
            overrides.insert("write_binary".to_string(), "false".to_string());
        }
        if let Some(radius) = self.soma_radius {
            overrides.insert("soma_radius".to_string(), radius.to_string());
            overrides.insert("soma_radius_mode".to_string(), "fixed".to_string());
        }
        if self.mean_soma_radius {
            overrides.insert("soma_radius_mode".to_string(), "mean_distance".to_string());
        }
        if self.soma_center {
            overrides.insert("include_soma_center".to_string(), "true".to_string());
        }
        if self.abort_on_error {
            overrides.insert("on_error".to_string(), FailurePolicy::Abort.to_string());
        }
        if self.verbose {
            overrides.insert("log_level".to_string(), "debug".to_string());
            overrides.insert("log_skipped_sections".to_string(), "true".to_string());
        }
        overrides
    }
}

/// Parses everything except the `--debug-*` flags, which are read by [`parse_debug_flags`]
fn parse_args<I>(raw: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = String>,
{
    let matches = Args::command()
        .after_help(debug_flags_help())
        .try_get_matches_from(raw.into_iter().filter(|arg| !is_debug_flag(arg)))?;
    Args::from_arg_matches(&matches)
}

fn start_logging(
    log_dir: Option<&Path>,
    debug_flags: &CrateDebugFlags,
    level: &str,
) -> Result<LoggingGuard> {
    match log_dir {
        #[cfg(feature = "file-logging")]
        Some(dir) => init_logging_with_file(debug_flags, level, dir),
        #[cfg(not(feature = "file-logging"))]
        Some(dir) => {
            let guard = init_logging(debug_flags, level)?;
            tracing::warn!(
                "Ignoring --log-dir {}: built without the file-logging feature",
                dir.display()
            );
            Ok(guard)
        }
        None => init_logging(debug_flags, level),
    }
}

fn run(args: &Args, debug_flags: &CrateDebugFlags) -> Result<bool> {
    let overrides = args.overrides();
    let config = load_config(args.config.as_deref(), Some(&overrides))
        .context("failed to load configuration")?;

    let _guard = start_logging(args.log_dir.as_deref(), debug_flags, &config.logging.level)?;

    let options = ConversionOptions::from_config(&config);
    info!(
        "Converting {} inputs (recenter: {}, binary: {})",
        args.inputs.len(),
        options.recenter,
        options.write_binary
    );

    let summary = convert_batch(&args.inputs, &options, &DefaultLoader, config.batch.on_error);

    for report in &summary.converted {
        match &report.binary_path {
            Some(binary_path) => println!(
                "{} -> {}, {} ({} sections, {} points)",
                report.input.display(),
                report.json_path.display(),
                binary_path.display(),
                report.section_count,
                report.point_count
            ),
            None => println!(
                "{} -> {} ({} sections, {} points)",
                report.input.display(),
                report.json_path.display(),
                report.section_count,
                report.point_count
            ),
        }
    }
    for failure in &summary.failed {
        eprintln!("failed: {}", failure);
    }

    info!(
        "Converted {} of {} inputs{}",
        summary.converted.len(),
        args.inputs.len(),
        if summary.aborted { " (aborted)" } else { "" }
    );
    Ok(summary.is_success())
}

fn main() -> ExitCode {
    let debug_flags = parse_debug_flags();
    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };
    match run(&args, &debug_flags) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_reflect_flags() {
        let args = Args::parse_from([
            "neuromorph-convert",
            "--json-only",
            "--soma-radius",
            "7.5",
            "--abort-on-error",
            "cell.swc",
        ]);
        let overrides = args.overrides();
        assert_eq!(overrides.get("write_binary").map(String::as_str), Some("false"));
        assert_eq!(overrides.get("soma_radius").map(String::as_str), Some("7.5"));
        assert_eq!(overrides.get("on_error").map(String::as_str), Some("abort"));
        assert!(!overrides.contains_key("recenter"));
    }

    #[test]
    fn inputs_are_required() {
        assert!(Args::try_parse_from(["neuromorph-convert"]).is_err());
    }

    #[test]
    fn debug_flags_are_left_out_of_clap_parsing() {
        let raw = [
            "neuromorph-convert",
            "--debug-neuromorph-io",
            "a.swc",
            "--debug-all",
            "b.swc",
        ]
        .map(String::from);
        let args = parse_args(raw.clone()).unwrap();
        assert_eq!(args.inputs, vec![PathBuf::from("a.swc"), PathBuf::from("b.swc")]);

        let flags = CrateDebugFlags::from_args(raw);
        assert!(flags.is_enabled("neuromorph-io"));
        assert!(flags.is_enabled("neuromorph-convert"));
    }

    #[test]
    fn help_lists_debug_flags() {
        let help = Args::command()
            .after_help(debug_flags_help())
            .render_long_help()
            .to_string();
        assert!(help.contains("--debug-all"));
        assert!(help.contains("NEUROMORPH_DEBUG"));
    }
}
