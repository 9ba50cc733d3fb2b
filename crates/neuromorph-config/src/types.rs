// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a table in `neuromorph.toml`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuromorphConfig {
    pub conversion: ConversionConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

/// Per-file conversion settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Translate the morphology so the soma center is the origin before extraction
    pub recenter: bool,
    /// Write `<base>.bin` next to `<base>.json`
    pub write_binary: bool,
    pub soma_radius_mode: SomaRadiusMode,
    /// Radius used with `SomaRadiusMode::Fixed`
    pub soma_radius: f32,
    /// Add the soma center to the structured document
    pub include_soma_center: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            recenter: false,
            write_binary: true,
            soma_radius_mode: SomaRadiusMode::Fixed,
            soma_radius: 5.0,
            include_soma_center: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SomaRadiusMode {
    #[default]
    Fixed,
    MeanDistance,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub on_error: FailurePolicy,
}

/// What a multi-file run does when one input fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the failure and go on with the next input
    #[default]
    Continue,
    /// Stop at the first failing input
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}

impl Display for FailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Log every section dropped because of its type
    pub log_skipped_sections: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_skipped_sections: false,
        }
    }
}
