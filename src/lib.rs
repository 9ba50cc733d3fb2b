//! # neuromorph - neuronal morphology export
//!
//! Converts a loaded neuronal morphology (a soma plus trees of polyline sections) into two
//! interchangeable representations:
//!
//! - a structured JSON document for tooling and visualization
//! - a flat buffer of little-endian float32 records for fast loading by renderers and
//!   simulators
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neuromorph::prelude::*;
//! use std::path::Path;
//!
//! let morphology = load_morphology(Path::new("cell.swc"))?;
//! let extraction = extract(&morphology)?;
//!
//! let json = encode_structured(&extraction).to_json_string()?;
//! let buffer = encode_binary(&extraction)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: neuromorph-structures, neuromorph-config   │
//! │  (Section, Morphology, NeuriteType, configuration)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Serialization: neuromorph-serialization                │
//! │  (tree walker, JSON document, float32 records)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  I/O: neuromorph-io                                     │
//! │  (SWC loader, recenter, atomic writes, batches)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use neuromorph_config as config;
pub use neuromorph_io as io;
pub use neuromorph_observability as observability;
pub use neuromorph_serialization as serialization;
pub use neuromorph_structures as structures;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::structures::{
        Morphology, MorphologyError, NeuriteType, SamplePoint, Section, SectionId, SectionKind,
    };

    pub use crate::serialization::{
        decode_binary, encode_binary, encode_structured, extract, Document, Extraction,
        TreeWalker, WalkerOptions,
    };

    pub use crate::io::{convert_batch, convert_file, load_morphology, ConversionOptions};

    pub use crate::config::{load_config, FailurePolicy, NeuromorphConfig};
}
