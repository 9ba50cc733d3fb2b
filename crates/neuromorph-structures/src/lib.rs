// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The core crate for neuromorph. Defines the morphology data model shared by the loader,
//! the tree walker and both encoders.
//!
//! A [`Morphology`] is an immutable, ordered collection of [`Section`]s as handed over by an
//! upstream loader. Each section carries a closed [`SectionKind`] classification, its parent
//! and children linkage, and its ordered [`SamplePoint`]s.
//!
//! ```
//! use neuromorph_structures::{Morphology, NeuriteType, SamplePoint, Section, SectionId, SectionKind};
//!
//! let soma = Section::new(SectionId(0), SectionKind::Soma, None, vec![], vec![SamplePoint::new(0.0, 0.0, 0.0, 0.0)]);
//! let axon = Section::new(
//!     SectionId(1),
//!     SectionKind::Neurite(NeuriteType::Axon),
//!     None,
//!     vec![],
//!     vec![SamplePoint::new(0.0, 0.0, 0.0, 1.0), SamplePoint::new(1.0, 0.0, 0.0, 0.9)],
//! );
//! let morphology = Morphology::from_sections(vec![soma, axon]).unwrap();
//! assert_eq!(morphology.len(), 2);
//! assert_eq!(morphology.neurite_sections().count(), 1);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
mod morphology;
mod section;
mod types;

pub use error::MorphologyError;
pub use morphology::Morphology;
pub use section::Section;
pub use types::{NeuriteType, SamplePoint, SectionId, SectionKind};
