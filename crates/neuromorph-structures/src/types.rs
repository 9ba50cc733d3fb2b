// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identity, sample and classification types.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifier of a section as assigned by the upstream loader. Never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u32);

impl SectionId {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SectionId {
    fn from(value: u32) -> Self {
        SectionId(value)
    }
}

/// One position + radius sample along a section
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
}

impl SamplePoint {
    pub const fn new(x: f32, y: f32, z: f32, radius: f32) -> Self {
        Self { x, y, z, radius }
    }

    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns a copy moved by the given offset. The radius is unchanged.
    pub fn translated(&self, offset: [f32; 3]) -> Self {
        Self {
            x: self.x + offset[0],
            y: self.y + offset[1],
            z: self.z + offset[2],
            radius: self.radius,
        }
    }
}

/// Polyline neurite classification.
///
/// The discriminants are the native enumeration values. The zero-indexed type code used by
/// both encodings is the native value minus one. The soma is not part of this table.
///
/// # Example
/// ```
/// use neuromorph_structures::NeuriteType;
///
/// assert_eq!(NeuriteType::Axon.type_code(), 0);
/// assert_eq!(NeuriteType::BasalDendrite.type_name(), "basal_dendrite");
/// assert_eq!(NeuriteType::from_type_code(1), Some(NeuriteType::ApicalDendrite));
/// ```
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeuriteType {
    Axon = 1u8,
    ApicalDendrite = 2u8,
    BasalDendrite = 3u8,
}

impl NeuriteType {
    pub const ALL: [NeuriteType; 3] = [
        NeuriteType::Axon,
        NeuriteType::ApicalDendrite,
        NeuriteType::BasalDendrite,
    ];

    pub fn native_value(&self) -> u8 {
        *self as u8
    }

    pub fn type_code(&self) -> u8 {
        self.native_value() - 1
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NeuriteType::Axon => "axon",
            NeuriteType::ApicalDendrite => "apical_dendrite",
            NeuriteType::BasalDendrite => "basal_dendrite",
        }
    }

    pub fn from_type_code(code: u8) -> Option<NeuriteType> {
        Self::ALL.into_iter().find(|t| t.type_code() == code)
    }

    pub fn from_type_name(name: &str) -> Option<NeuriteType> {
        Self::ALL.into_iter().find(|t| t.type_name() == name)
    }
}

impl Display for NeuriteType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Closed classification of every upstream section.
///
/// `Other` keeps the raw upstream type code of sections that are neither soma nor a polyline
/// neurite; those are skipped by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Neurite(NeuriteType),
    Soma,
    Other(u16),
}

impl SectionKind {
    pub fn is_soma(&self) -> bool {
        matches!(self, SectionKind::Soma)
    }

    pub fn neurite_type(&self) -> Option<NeuriteType> {
        match self {
            SectionKind::Neurite(neurite_type) => Some(*neurite_type),
            SectionKind::Soma | SectionKind::Other(_) => None,
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Neurite(neurite_type) => write!(f, "{neurite_type}"),
            SectionKind::Soma => write!(f, "soma"),
            SectionKind::Other(raw) => write!(f, "other({raw})"),
        }
    }
}
