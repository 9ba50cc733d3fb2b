// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Morphology loading
//!
//! The converter core only sees a built [`Morphology`]; this module provides the loader seam
//! and an SWC reader.

use neuromorph_structures::{
    Morphology, MorphologyError, NeuriteType, SamplePoint, Section, SectionId, SectionKind,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file content cannot be interpreted as a morphology
    #[error("Cannot parse {}: {reason}", path.display())]
    Unparsable { path: PathBuf, reason: String },

    #[error("{} does not describe a valid morphology: {source}", path.display())]
    InvalidMorphology {
        path: PathBuf,
        source: MorphologyError,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Unparsable { path, .. }
            | LoadError::InvalidMorphology { path, .. } => path,
        }
    }
}

/// Source of fully materialized morphologies
pub trait MorphologyLoader {
    fn load(&self, path: &Path) -> Result<Morphology, LoadError>;
}

/// Picks a reader from the file extension. Only `.swc` is supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoader;

impl MorphologyLoader for DefaultLoader {
    fn load(&self, path: &Path) -> Result<Morphology, LoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "swc" => SwcLoader.load(path),
            other => Err(LoadError::Unparsable {
                path: path.to_path_buf(),
                reason: format!("unsupported morphology format '.{other}'"),
            }),
        }
    }
}

/// Loads a morphology with the [`DefaultLoader`]
pub fn load_morphology(path: &Path) -> Result<Morphology, LoadError> {
    DefaultLoader.load(path)
}

const SWC_COLUMNS: usize = 7;
const SWC_SOMA: u16 = 1;
const SWC_NO_PARENT: i64 = -1;

/// SWC reader.
///
/// Samples of type 1 make up the soma (section id 0). The other samples are grouped into
/// unbranched sections, numbered from 1 in file order; a section ends at a branch point, a
/// type change or a tip. Every child section starts with a copy of its branch point.
/// SWC types 2, 3 and 4 are axon, basal dendrite and apical dendrite; any other type is kept
/// as [`SectionKind::Other`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SwcLoader;

impl MorphologyLoader for SwcLoader {
    fn load(&self, path: &Path) -> Result<Morphology, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&content, path)
    }
}

#[derive(Debug, Clone, Copy)]
struct SwcSample {
    id: i64,
    type_code: u16,
    point: SamplePoint,
    parent: i64,
}

/// A neurite section while it is being assembled
struct PendingSection {
    type_code: u16,
    parent: Option<usize>,
    children: Vec<usize>,
    points: Vec<SamplePoint>,
    last_sample: i64,
}

impl SwcLoader {
    /// Parses SWC text. `path` is only used for error context.
    pub fn parse_str(&self, content: &str, path: &Path) -> Result<Morphology, LoadError> {
        let unparsable = |reason: String| LoadError::Unparsable {
            path: path.to_path_buf(),
            reason,
        };

        let mut samples: Vec<SwcSample> = Vec::new();
        let mut sample_index: HashMap<i64, usize> = HashMap::new();
        for (line_index, line) in content.lines().enumerate() {
            let line_number = line_index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let sample = parse_sample(line)
                .map_err(|reason| unparsable(format!("line {line_number}: {reason}")))?;
            if sample.parent != SWC_NO_PARENT && !sample_index.contains_key(&sample.parent) {
                return Err(unparsable(format!(
                    "line {line_number}: parent {} of sample {} is not defined before it",
                    sample.parent, sample.id
                )));
            }
            if sample_index.insert(sample.id, samples.len()).is_some() {
                return Err(unparsable(format!(
                    "line {line_number}: sample id {} is defined twice",
                    sample.id
                )));
            }
            samples.push(sample);
        }

        let mut neurite_children: HashMap<i64, usize> = HashMap::new();
        for sample in samples.iter().filter(|s| s.type_code != SWC_SOMA) {
            *neurite_children.entry(sample.parent).or_default() += 1;
        }

        let mut soma_points: Vec<SamplePoint> = Vec::new();
        let mut pending: Vec<PendingSection> = Vec::new();
        let mut sample_section: HashMap<i64, usize> = HashMap::new();

        for sample in &samples {
            if sample.type_code == SWC_SOMA {
                soma_points.push(sample.point);
                continue;
            }

            let parent_sample = (sample.parent != SWC_NO_PARENT)
                .then(|| samples[sample_index[&sample.parent]])
                .filter(|p| p.type_code != SWC_SOMA);

            let section_index = match parent_sample {
                None => {
                    pending.push(PendingSection {
                        type_code: sample.type_code,
                        parent: None,
                        children: Vec::new(),
                        points: vec![sample.point],
                        last_sample: sample.id,
                    });
                    pending.len() - 1
                }
                Some(parent) => {
                    let parent_section = sample_section[&parent.id];
                    let continues = neurite_children.get(&parent.id) == Some(&1)
                        && pending[parent_section].type_code == sample.type_code
                        && pending[parent_section].last_sample == parent.id;
                    if continues {
                        let section = &mut pending[parent_section];
                        section.points.push(sample.point);
                        section.last_sample = sample.id;
                        parent_section
                    } else {
                        pending.push(PendingSection {
                            type_code: sample.type_code,
                            parent: Some(parent_section),
                            children: Vec::new(),
                            points: vec![parent.point, sample.point],
                            last_sample: sample.id,
                        });
                        let new_index = pending.len() - 1;
                        pending[parent_section].children.push(new_index);
                        new_index
                    }
                }
            };
            sample_section.insert(sample.id, section_index);
        }

        debug!(
            "Parsed {} SWC samples into {} neurite sections and {} soma points from {}",
            samples.len(),
            pending.len(),
            soma_points.len(),
            path.display()
        );

        Morphology::from_sections(build_sections(soma_points, pending)).map_err(|source| {
            LoadError::InvalidMorphology {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

fn parse_sample(line: &str) -> Result<SwcSample, String> {
    let columns: Vec<&str> = line.split_whitespace().collect();
    if columns.len() < SWC_COLUMNS {
        return Err(format!(
            "expected {SWC_COLUMNS} columns, found {}",
            columns.len()
        ));
    }
    // nan and inf parse as f32 but have no JSON number form
    let float = |index: usize, name: &str| {
        columns[index]
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| format!("invalid {name} '{}'", columns[index]))
    };
    let id = columns[0]
        .parse::<i64>()
        .map_err(|_| format!("invalid sample id '{}'", columns[0]))?;
    let type_code = columns[1]
        .parse::<u16>()
        .map_err(|_| format!("invalid type '{}'", columns[1]))?;
    let point = SamplePoint::new(
        float(2, "x")?,
        float(3, "y")?,
        float(4, "z")?,
        float(5, "radius")?,
    );
    let parent = columns[6]
        .parse::<i64>()
        .map_err(|_| format!("invalid parent '{}'", columns[6]))?;
    Ok(SwcSample {
        id,
        type_code,
        point,
        parent,
    })
}

fn section_kind(type_code: u16) -> SectionKind {
    match type_code {
        SWC_SOMA => SectionKind::Soma,
        2 => SectionKind::Neurite(NeuriteType::Axon),
        3 => SectionKind::Neurite(NeuriteType::BasalDendrite),
        4 => SectionKind::Neurite(NeuriteType::ApicalDendrite),
        other => SectionKind::Other(other),
    }
}

/// Neurite section at `index` gets id `index + 1`; the soma is id 0.
fn build_sections(soma_points: Vec<SamplePoint>, pending: Vec<PendingSection>) -> Vec<Section> {
    let section_id = |index: usize| SectionId(index as u32 + 1);
    let mut sections: Vec<Section> = Vec::with_capacity(pending.len() + 1);
    if !soma_points.is_empty() {
        sections.push(Section::new(
            SectionId(0),
            SectionKind::Soma,
            None,
            Vec::new(),
            soma_points,
        ));
    }
    for (index, section) in pending.into_iter().enumerate() {
        sections.push(Section::new(
            section_id(index),
            section_kind(section.type_code),
            section.parent.map(section_id),
            section.children.into_iter().map(section_id).collect(),
            section.points,
        ));
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRANCHING_SWC: &str = "\
# soma, then an axon that forks once, then a basal dendrite
1 1 0 0 0 5 -1
2 1 0 1 0 5 1
3 2 0 0 1 1.0 1
4 2 0 0 2 0.9 3
5 2 1 0 3 0.8 4
6 2 -1 0 3 0.7 4
7 3 0 -1 0 1.2 1
8 3 0 -2 0 1.1 7
";

    fn parse(content: &str) -> Result<Morphology, LoadError> {
        SwcLoader.parse_str(content, Path::new("test.swc"))
    }

    #[test]
    fn test_branching_file_is_split_into_sections() {
        let morphology = parse(BRANCHING_SWC).unwrap();
        let ids: Vec<u32> = morphology.sections().iter().map(|s| s.id().value()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        let soma = morphology.soma_section().unwrap();
        assert_eq!(soma.points().len(), 2);

        let trunk = morphology.get(SectionId(1)).unwrap();
        assert_eq!(trunk.kind(), SectionKind::Neurite(NeuriteType::Axon));
        assert_eq!(trunk.parent(), None);
        assert_eq!(trunk.points().len(), 2);
        assert_eq!(trunk.children(), &[SectionId(2), SectionId(3)]);

        let branch = morphology.get(SectionId(2)).unwrap();
        assert_eq!(branch.parent(), Some(SectionId(1)));
        // starts with a copy of the branch point
        assert_eq!(branch.points()[0].position(), [0.0, 0.0, 2.0]);
        assert_eq!(branch.points()[1].position(), [1.0, 0.0, 3.0]);

        let basal = morphology.get(SectionId(4)).unwrap();
        assert_eq!(basal.kind(), SectionKind::Neurite(NeuriteType::BasalDendrite));
        assert_eq!(basal.points().len(), 2);
    }

    #[test]
    fn test_unknown_type_becomes_other() {
        let morphology = parse("1 1 0 0 0 5 -1\n2 7 1 0 0 1 1\n").unwrap();
        assert_eq!(morphology.sections()[1].kind(), SectionKind::Other(7));
    }

    #[test]
    fn test_type_change_starts_new_section() {
        let morphology = parse("1 1 0 0 0 5 -1\n2 3 1 0 0 1 1\n3 4 2 0 0 1 2\n").unwrap();
        assert_eq!(morphology.len(), 3);
        let apical = morphology.get(SectionId(2)).unwrap();
        assert_eq!(apical.kind(), SectionKind::Neurite(NeuriteType::ApicalDendrite));
        assert_eq!(apical.parent(), Some(SectionId(1)));
    }

    #[test]
    fn test_malformed_lines_are_unparsable() {
        for content in [
            "1 1 0 0 0\n",
            "1 1 0 0 zero 5 -1\n",
            "1 1 0 0 0 5 -1\n2 2 0 0 0 1 9\n",
            "1 1 0 0 0 5 -1\n1 1 0 0 0 5 -1\n",
        ] {
            assert!(
                matches!(parse(content), Err(LoadError::Unparsable { .. })),
                "{content:?} should not parse"
            );
        }
    }

    #[test]
    fn test_non_finite_values_are_unparsable() {
        for content in [
            "1 1 0 0 0 5 -1\n2 2 nan 0 0 1.0 1\n",
            "1 1 0 0 0 5 -1\n2 2 0 inf 0 1.0 1\n",
            "1 1 0 0 0 5 -1\n2 2 0 0 -infinity 1.0 1\n",
            "1 1 0 0 0 NaN -1\n",
        ] {
            match parse(content) {
                Err(LoadError::Unparsable { reason, .. }) => {
                    assert!(reason.starts_with("line "), "{reason}");
                }
                other => panic!("{content:?} should not parse, got {other:?}"),
            }
        }
        let error = parse("1 1 0 0 0 5 -1\n2 2 nan 0 0 1.0 1\n").unwrap_err();
        assert!(error.to_string().contains("line 2"), "{error}");
    }

    #[test]
    fn test_file_without_soma_still_loads() {
        let morphology = parse("1 2 0 0 0 1 -1\n2 2 1 0 0 1 1\n").unwrap();
        assert!(morphology.soma_section().is_none());
        assert_eq!(morphology.sections()[0].id(), SectionId(1));
    }

    #[test]
    fn test_unsupported_extension_is_unparsable() {
        let error = load_morphology(Path::new("cell.asc")).unwrap_err();
        assert!(matches!(error, LoadError::Unparsable { .. }));
        assert_eq!(error.path(), Path::new("cell.asc"));
    }
}
