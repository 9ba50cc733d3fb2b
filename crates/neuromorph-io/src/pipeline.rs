// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-file conversion and batch driver
//!
//! Each input is loaded, optionally recentered, walked once, and encoded to both outputs in
//! memory. Only when every encoding succeeded are the files written.

use neuromorph_config::{FailurePolicy, NeuromorphConfig, SomaRadiusMode};
use neuromorph_serialization::{
    encode_binary, BinaryError, StructuredEncoder, StructuredError, SomaRadius, TreeWalker,
    WalkerOptions,
};
use neuromorph_structures::MorphologyError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::loader::{LoadError, MorphologyLoader};
use crate::sink::write_all_or_nothing;
use crate::transform::recenter;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub recenter: bool,
    pub write_binary: bool,
    pub include_soma_center: bool,
    pub walker: WalkerOptions,
}

impl ConversionOptions {
    pub fn from_config(config: &NeuromorphConfig) -> Self {
        let soma_radius = match config.conversion.soma_radius_mode {
            SomaRadiusMode::Fixed => SomaRadius::Fixed(config.conversion.soma_radius),
            SomaRadiusMode::MeanDistance => SomaRadius::MeanDistance,
        };
        Self {
            recenter: config.conversion.recenter,
            write_binary: config.conversion.write_binary,
            include_soma_center: config.conversion.include_soma_center,
            walker: WalkerOptions {
                soma_radius,
                log_skipped_sections: config.logging.log_skipped_sections,
            },
        }
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::from_config(&NeuromorphConfig::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to extract {}: {source}", path.display())]
    Morphology {
        path: PathBuf,
        source: MorphologyError,
    },

    #[error("Failed to encode {} as JSON: {source}", path.display())]
    Structured {
        path: PathBuf,
        source: StructuredError,
    },

    #[error("Failed to encode {} as binary: {source}", path.display())]
    Binary { path: PathBuf, source: BinaryError },

    #[error("Failed to write outputs for {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl ConvertError {
    /// The input file this error concerns
    pub fn input_path(&self) -> &Path {
        match self {
            ConvertError::Load(load_error) => load_error.path(),
            ConvertError::Morphology { path, .. }
            | ConvertError::Structured { path, .. }
            | ConvertError::Binary { path, .. }
            | ConvertError::Write { path, .. } => path,
        }
    }
}

/// What a successful conversion wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub json_path: PathBuf,
    pub binary_path: Option<PathBuf>,
    pub section_count: usize,
    pub point_count: usize,
}

/// Input path without its extension: `cells/a.swc` -> `cells/a`
pub fn output_base(input: &Path) -> PathBuf {
    input.with_extension("")
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Converts one input, writing `<base>.json` and, in binary mode, `<base>.bin`.
///
/// # Errors
/// Any failure aborts this input before anything is written.
pub fn convert_file(
    input: &Path,
    options: &ConversionOptions,
    loader: &dyn MorphologyLoader,
) -> Result<ConversionReport, ConvertError> {
    let loaded = loader.load(input)?;
    let morphology = if options.recenter {
        recenter(&loaded)
    } else {
        loaded
    };

    let extraction = TreeWalker::new(options.walker)
        .extract(&morphology)
        .map_err(|source| ConvertError::Morphology {
            path: input.to_path_buf(),
            source,
        })?;

    let json = StructuredEncoder::new(options.include_soma_center)
        .encode(&extraction)
        .to_json_string()
        .map_err(|source| ConvertError::Structured {
            path: input.to_path_buf(),
            source,
        })?;
    let binary = if options.write_binary {
        Some(
            encode_binary(&extraction).map_err(|source| ConvertError::Binary {
                path: input.to_path_buf(),
                source,
            })?,
        )
    } else {
        None
    };

    let base = output_base(input);
    let json_path = with_suffix(&base, ".json");
    let binary_path = binary.as_ref().map(|_| with_suffix(&base, ".bin"));

    let mut artifacts: Vec<(&Path, &[u8])> = vec![(json_path.as_path(), json.as_bytes())];
    if let (Some(path), Some(bytes)) = (&binary_path, &binary) {
        artifacts.push((path.as_path(), bytes.as_slice()));
    }
    write_all_or_nothing(&artifacts).map_err(|source| ConvertError::Write {
        path: input.to_path_buf(),
        source,
    })?;

    let report = ConversionReport {
        input: input.to_path_buf(),
        json_path,
        binary_path,
        section_count: extraction.sections.len(),
        point_count: extraction.total_point_count(),
    };
    info!(
        "Converted {} ({} sections, {} points) -> {}",
        input.display(),
        report.section_count,
        report.point_count,
        report.json_path.display()
    );
    Ok(report)
}

/// Outcome of a multi-file run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub converted: Vec<ConversionReport>,
    pub failed: Vec<ConvertError>,
    /// Set when the run stopped early because of [`FailurePolicy::Abort`]
    pub aborted: bool,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Converts each input independently, following `policy` when one fails.
pub fn convert_batch(
    inputs: &[PathBuf],
    options: &ConversionOptions,
    loader: &dyn MorphologyLoader,
    policy: FailurePolicy,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for (index, input) in inputs.iter().enumerate() {
        match convert_file(input, options, loader) {
            Ok(report) => summary.converted.push(report),
            Err(conversion_error) => {
                error!("{}", conversion_error);
                summary.failed.push(conversion_error);
                if policy == FailurePolicy::Abort {
                    let remaining = inputs.len() - index - 1;
                    if remaining > 0 {
                        warn!("Aborting batch, {} inputs not processed", remaining);
                    }
                    summary.aborted = remaining > 0;
                    break;
                }
            }
        }
    }
    summary
}
