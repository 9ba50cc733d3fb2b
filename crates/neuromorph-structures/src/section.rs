// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::{SamplePoint, SectionId, SectionKind};

/// A section as materialized by the upstream loader.
///
/// For soma sections only the positions of `points` are meaningful; `parent` and `children`
/// are expected to be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    id: SectionId,
    kind: SectionKind,
    parent: Option<SectionId>,
    children: Vec<SectionId>,
    points: Vec<SamplePoint>,
}

impl Section {
    pub fn new(
        id: SectionId,
        kind: SectionKind,
        parent: Option<SectionId>,
        children: Vec<SectionId>,
        points: Vec<SamplePoint>,
    ) -> Self {
        Self {
            id,
            kind,
            parent,
            children,
            points,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    /// Children in upstream traversal order
    pub fn children(&self) -> &[SectionId] {
        &self.children
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Returns a copy of this section with every point moved by `offset`
    pub fn translated(&self, offset: [f32; 3]) -> Self {
        Self {
            points: self.points.iter().map(|p| p.translated(offset)).collect(),
            ..self.clone()
        }
    }
}
