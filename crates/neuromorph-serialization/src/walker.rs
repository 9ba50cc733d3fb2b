// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tree walker: classification and extraction of per-section records.
//!
//! The walker copies everything the encoders need out of the morphology up front, so both
//! encoders work on plain owned records and never touch the loader's object model.

use neuromorph_structures::{
    Morphology, MorphologyError, NeuriteType, SamplePoint, Section, SectionId, SectionKind,
};
use tracing::debug;

/// Soma radius used when nothing else is configured
pub const DEFAULT_SOMA_RADIUS: f32 = 5.0;

/// How the single scalar soma radius is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SomaRadius {
    /// A fixed convention value, independent of the soma points
    Fixed(f32),
    /// Mean Euclidean distance of the soma points from their center
    MeanDistance,
}

impl Default for SomaRadius {
    fn default() -> Self {
        SomaRadius::Fixed(DEFAULT_SOMA_RADIUS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WalkerOptions {
    pub soma_radius: SomaRadius,
    /// Emit a debug diagnostic for every section dropped because of its type
    pub log_skipped_sections: bool,
}

/// Extracted neurite section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    pub id: SectionId,
    pub parent: Option<SectionId>,
    pub children: Vec<SectionId>,
    pub neurite_type: NeuriteType,
    pub points: Vec<SamplePoint>,
}

impl SectionRecord {
    pub fn type_name(&self) -> &'static str {
        self.neurite_type.type_name()
    }

    pub fn type_code(&self) -> u8 {
        self.neurite_type.type_code()
    }
}

/// Extracted soma. Positions only; the radius is a single derived scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct SomaRecord {
    pub id: SectionId,
    pub points: Vec<[f32; 3]>,
    /// Mean of `points`
    pub center: [f32; 3],
    pub radius: f32,
}

/// Walker output: retained neurite sections in upstream order, and the soma.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub sections: Vec<SectionRecord>,
    pub soma: SomaRecord,
}

impl Extraction {
    /// Sum of point counts over all neurite sections
    pub fn total_point_count(&self) -> usize {
        self.sections.iter().map(|s| s.points.len()).sum()
    }

    /// Number of records in the binary encoding: one per neurite point plus the soma record
    pub fn expected_binary_record_count(&self) -> usize {
        self.total_point_count() + 1
    }
}

/// Classifies and extracts sections of a morphology.
#[derive(Debug, Clone, Default)]
pub struct TreeWalker {
    options: WalkerOptions,
}

impl TreeWalker {
    pub fn new(options: WalkerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WalkerOptions {
        &self.options
    }

    /// Walks the morphology in upstream order.
    ///
    /// Sections classified as [`SectionKind::Other`] produce no record and no error. Every
    /// soma point, index 0 included, is exported.
    ///
    /// # Errors
    /// - [`MorphologyError::MissingSoma`] when no section is a soma
    /// - [`MorphologyError::MultipleSomata`] when more than one is
    /// - [`MorphologyError::EmptySection`] when a neurite section or the soma has no points
    pub fn extract(&self, morphology: &Morphology) -> Result<Extraction, MorphologyError> {
        let mut sections: Vec<SectionRecord> = Vec::with_capacity(morphology.len());
        let mut soma: Option<SomaRecord> = None;
        let mut skipped: usize = 0;

        for section in morphology.sections() {
            match section.kind() {
                SectionKind::Neurite(neurite_type) => {
                    sections.push(extract_neurite(section, neurite_type)?);
                }
                SectionKind::Soma => {
                    if let Some(existing) = &soma {
                        return Err(MorphologyError::MultipleSomata {
                            first: existing.id,
                            second: section.id(),
                        });
                    }
                    soma = Some(self.extract_soma(section)?);
                }
                SectionKind::Other(raw_type) => {
                    skipped += 1;
                    if self.options.log_skipped_sections {
                        debug!(
                            "Skipping section {} with unsupported type {}",
                            section.id(),
                            raw_type
                        );
                    }
                }
            }
        }

        let soma = soma.ok_or(MorphologyError::MissingSoma)?;
        if self.options.log_skipped_sections {
            debug!(
                "Extracted {} neurite sections ({} skipped), soma {}",
                sections.len(),
                skipped,
                soma.id
            );
        } else {
            debug!(
                "Extracted {} neurite sections, soma {}",
                sections.len(),
                soma.id
            );
        }
        Ok(Extraction { sections, soma })
    }

    fn extract_soma(&self, section: &Section) -> Result<SomaRecord, MorphologyError> {
        if section.points().is_empty() {
            return Err(MorphologyError::EmptySection { id: section.id() });
        }
        let points: Vec<[f32; 3]> = section.points().iter().map(|p| p.position()).collect();
        let center = mean_position(&points);
        let radius = match self.options.soma_radius {
            SomaRadius::Fixed(radius) => radius,
            SomaRadius::MeanDistance => mean_distance(&points, center),
        };
        Ok(SomaRecord {
            id: section.id(),
            points,
            center,
            radius,
        })
    }
}

/// Extracts with default options
pub fn extract(morphology: &Morphology) -> Result<Extraction, MorphologyError> {
    TreeWalker::default().extract(morphology)
}

fn extract_neurite(
    section: &Section,
    neurite_type: NeuriteType,
) -> Result<SectionRecord, MorphologyError> {
    if section.points().is_empty() {
        return Err(MorphologyError::EmptySection { id: section.id() });
    }
    Ok(SectionRecord {
        id: section.id(),
        parent: section.parent(),
        children: section.children().to_vec(),
        neurite_type,
        points: section.points().to_vec(),
    })
}

/// Accumulates in f64; `points` must not be empty.
pub(crate) fn mean_position(points: &[[f32; 3]]) -> [f32; 3] {
    let mut sum = [0f64; 3];
    for point in points {
        for (total, &value) in sum.iter_mut().zip(point) {
            *total += value as f64;
        }
    }
    let count = points.len() as f64;
    [
        (sum[0] / count) as f32,
        (sum[1] / count) as f32,
        (sum[2] / count) as f32,
    ]
}

fn mean_distance(points: &[[f32; 3]], center: [f32; 3]) -> f32 {
    let total: f64 = points
        .iter()
        .map(|p| {
            let dx = (p[0] - center[0]) as f64;
            let dy = (p[1] - center[1]) as f64;
            let dz = (p[2] - center[2]) as f64;
            (dx * dx + dy * dy + dz * dz).sqrt()
        })
        .sum();
    (total / points.len() as f64) as f32
}
