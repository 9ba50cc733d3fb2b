// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::SectionId;

/// Errors raised while building a morphology or extracting records from it.
///
/// All of these are fatal for the morphology they concern; none are retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MorphologyError {
    /// The morphology has no soma section
    #[error("Morphology has no soma section")]
    MissingSoma,

    /// More than one section is classified as soma
    #[error("Morphology has more than one soma section ({first} and {second})")]
    MultipleSomata { first: SectionId, second: SectionId },

    /// A retained section has no points and cannot be encoded
    #[error("Section {id} has no points")]
    EmptySection { id: SectionId },

    #[error("Section id {id} appears more than once")]
    DuplicateSectionId { id: SectionId },

    #[error("Section {id} refers to unknown parent {parent}")]
    UnknownParent { id: SectionId, parent: SectionId },

    /// The children list of a section does not match the sections naming it as parent
    #[error("Children of section {id} do not match the sections that name it as parent")]
    InconsistentChildren { id: SectionId },
}
