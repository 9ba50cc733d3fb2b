// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuromorph serialization
//!
//! Turns a loaded [`Morphology`](neuromorph_structures::Morphology) into two independent views
//! of the same records:
//!
//! - **[`TreeWalker`]** - classifies every section and copies it into plain
//!   [`SectionRecord`]s plus one [`SomaRecord`]
//! - **[`encode_structured`]** - a self-describing [`Document`] written as JSON
//! - **[`encode_binary`]** - a headerless buffer of 7-field little-endian float32 records
//!
//! ## Type codes
//!
//! Neurite sections store `native value - 1` as type code (axon 0, apical dendrite 1,
//! basal dendrite 2) in both encodings. The soma record of the binary buffer always stores the
//! constant [`SOMA_BINARY_TYPE_CODE`] (1) in its type field; it does not come from the neurite
//! table and therefore shares its value with the apical dendrite code. Consumers tell the soma
//! record apart by its position (always last).
//!
//! ## Basic Usage
//!
//! ```rust
//! use neuromorph_serialization::{encode_binary, encode_structured, extract, BYTES_PER_RECORD};
//! use neuromorph_structures::{Morphology, NeuriteType, SamplePoint, Section, SectionId, SectionKind};
//!
//! let soma = Section::new(SectionId(0), SectionKind::Soma, None, vec![], vec![SamplePoint::default()]);
//! let axon = Section::new(
//!     SectionId(3),
//!     SectionKind::Neurite(NeuriteType::Axon),
//!     None,
//!     vec![],
//!     vec![SamplePoint::new(0.0, 0.0, 0.0, 1.0), SamplePoint::new(1.0, 0.0, 0.0, 0.9)],
//! );
//! let morphology = Morphology::from_sections(vec![soma, axon]).unwrap();
//!
//! let extraction = extract(&morphology).unwrap();
//! let document = encode_structured(&extraction);
//! let buffer = encode_binary(&extraction).unwrap();
//!
//! assert_eq!(document.sections.len(), 1);
//! assert_eq!(buffer.len(), 3 * BYTES_PER_RECORD);
//! ```

mod binary;
mod structured;
mod walker;

pub use binary::{
    decode_binary, encode_binary, BinaryError, BinaryRecord, BYTES_PER_RECORD, FIELDS_PER_RECORD,
    MAX_EXACT_ID, NO_PARENT_SENTINEL, SOMA_BINARY_TYPE_CODE,
};
pub use structured::{
    encode_structured, Document, PointObject, SectionObject, SomaObject, SomaPointObject,
    StructuredEncoder, StructuredError, SOMA_TYPE_NAME,
};
pub use walker::{
    extract, Extraction, SectionRecord, SomaRadius, SomaRecord, TreeWalker, WalkerOptions,
    DEFAULT_SOMA_RADIUS,
};
