// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuromorph-observability
//!
//! Logging setup shared by the neuromorph tools, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: additionally write logs to a file

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known neuromorph crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "neuromorph-structures",
    "neuromorph-serialization",
    "neuromorph-io",
    "neuromorph-config",
    "neuromorph-observability",
    "neuromorph",
    "neuromorph-convert",
];
