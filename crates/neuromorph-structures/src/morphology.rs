// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};

use crate::{MorphologyError, Section, SectionId};

/// Root aggregate: every section of one neuron in upstream iteration order.
///
/// Built once through [`Morphology::from_sections`], which checks the linkage invariants.
/// There is no way to mutate a morphology after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Morphology {
    sections: Vec<Section>,
}

impl Morphology {
    /// Builds a morphology, checking that
    /// - section ids are unique
    /// - every parent id refers to a section of this morphology
    /// - each children list matches the set of sections naming that section as parent
    ///
    /// The presence of exactly one soma is checked later by the walker, so that loaders can
    /// hand over soma-less morphologies and get a [`MorphologyError::MissingSoma`] at extraction.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, MorphologyError> {
        let mut ids: HashSet<SectionId> = HashSet::with_capacity(sections.len());
        for section in &sections {
            if !ids.insert(section.id()) {
                return Err(MorphologyError::DuplicateSectionId { id: section.id() });
            }
        }

        let mut expected_children: HashMap<SectionId, Vec<SectionId>> = HashMap::new();
        for section in &sections {
            if let Some(parent) = section.parent() {
                if !ids.contains(&parent) {
                    return Err(MorphologyError::UnknownParent {
                        id: section.id(),
                        parent,
                    });
                }
                expected_children
                    .entry(parent)
                    .or_default()
                    .push(section.id());
            }
        }

        for section in &sections {
            let mut declared = section.children().to_vec();
            let mut expected = expected_children.remove(&section.id()).unwrap_or_default();
            declared.sort_unstable();
            expected.sort_unstable();
            if declared != expected {
                return Err(MorphologyError::InconsistentChildren { id: section.id() });
            }
        }

        Ok(Self { sections })
    }

    /// All sections in upstream order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }

    /// First section classified as soma, if any
    pub fn soma_section(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind().is_soma())
    }

    /// Sections classified as axon, apical or basal dendrite
    pub fn neurite_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(|s| s.kind().neurite_type().is_some())
    }

    /// Returns a new morphology with every point moved by `offset`.
    pub fn translated(&self, offset: [f32; 3]) -> Self {
        Self {
            sections: self.sections.iter().map(|s| s.translated(offset)).collect(),
        }
    }
}
