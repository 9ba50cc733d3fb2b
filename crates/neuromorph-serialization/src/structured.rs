// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Structured (JSON) encoding.
//!
//! The document is a set of plain serde structs. Field declaration order is the key order of
//! the output, and every numeric leaf is a plain JSON integer or float.

use neuromorph_structures::{NeuriteType, SamplePoint, SectionId};
use serde::{Deserialize, Serialize};

use crate::walker::mean_position;
use crate::{Extraction, SectionRecord, SomaRecord};

/// Type name written for the soma object
pub const SOMA_TYPE_NAME: &str = "soma";

#[derive(Debug, thiserror::Error)]
pub enum StructuredError {
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Section {id} has typename '{typename}' which does not match typevalue {typevalue}")]
    TypeMismatch {
        id: SectionId,
        typename: String,
        typevalue: u8,
    },

    #[error("Soma object has type '{0}', expected 'soma'")]
    NotASoma(String),

    #[error("Soma {id} has no points")]
    EmptySoma { id: SectionId },
}

/// Top level document: `{ "sections": [...], "soma": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub sections: Vec<SectionObject>,
    pub soma: SomaObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionObject {
    pub id: SectionId,
    /// `null` for the root section of a neurite tree
    pub parent: Option<SectionId>,
    pub children: Vec<SectionId>,
    pub typename: String,
    pub typevalue: u8,
    pub points: Vec<PointObject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointObject {
    pub position: [f32; 3],
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SomaObject {
    pub id: SectionId,
    #[serde(rename = "type")]
    pub type_name: String,
    pub points: Vec<SomaPointObject>,
    pub radius: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SomaPointObject {
    pub position: [f32; 3],
}

/// Builds [`Document`]s from extractions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredEncoder {
    /// Also write the soma center as `soma.center`
    pub include_soma_center: bool,
}

impl StructuredEncoder {
    pub fn new(include_soma_center: bool) -> Self {
        Self {
            include_soma_center,
        }
    }

    pub fn encode(&self, extraction: &Extraction) -> Document {
        Document {
            sections: extraction.sections.iter().map(section_object).collect(),
            soma: self.soma_object(&extraction.soma),
        }
    }

    fn soma_object(&self, soma: &SomaRecord) -> SomaObject {
        SomaObject {
            id: soma.id,
            type_name: SOMA_TYPE_NAME.to_string(),
            points: soma
                .points
                .iter()
                .map(|&position| SomaPointObject { position })
                .collect(),
            radius: soma.radius,
            center: self.include_soma_center.then_some(soma.center),
        }
    }
}

/// Encodes with the default encoder (no soma center)
pub fn encode_structured(extraction: &Extraction) -> Document {
    StructuredEncoder::default().encode(extraction)
}

fn section_object(section: &SectionRecord) -> SectionObject {
    SectionObject {
        id: section.id,
        parent: section.parent,
        children: section.children.clone(),
        typename: section.type_name().to_string(),
        typevalue: section.type_code(),
        points: section
            .points
            .iter()
            .map(|p| PointObject {
                position: p.position(),
                radius: p.radius,
            })
            .collect(),
    }
}

impl Document {
    /// Pretty JSON with two-space indentation. Identical documents give identical text.
    pub fn to_json_string(&self) -> Result<String, StructuredError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, StructuredError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuilds the extraction this document was encoded from.
    ///
    /// The soma center is taken from `soma.center` when present, and recomputed from the soma
    /// points otherwise.
    pub fn to_extraction(&self) -> Result<Extraction, StructuredError> {
        let sections = self
            .sections
            .iter()
            .map(section_record)
            .collect::<Result<Vec<_>, _>>()?;

        if self.soma.type_name != SOMA_TYPE_NAME {
            return Err(StructuredError::NotASoma(self.soma.type_name.clone()));
        }
        if self.soma.points.is_empty() {
            return Err(StructuredError::EmptySoma { id: self.soma.id });
        }
        let points: Vec<[f32; 3]> = self.soma.points.iter().map(|p| p.position).collect();
        let center = self.soma.center.unwrap_or_else(|| mean_position(&points));

        Ok(Extraction {
            sections,
            soma: SomaRecord {
                id: self.soma.id,
                points,
                center,
                radius: self.soma.radius,
            },
        })
    }
}

fn section_record(object: &SectionObject) -> Result<SectionRecord, StructuredError> {
    let mismatch = || StructuredError::TypeMismatch {
        id: object.id,
        typename: object.typename.clone(),
        typevalue: object.typevalue,
    };
    let neurite_type = NeuriteType::from_type_code(object.typevalue).ok_or_else(mismatch)?;
    if neurite_type.type_name() != object.typename {
        return Err(mismatch());
    }
    Ok(SectionRecord {
        id: object.id,
        parent: object.parent,
        children: object.children.clone(),
        neurite_type,
        points: object
            .points
            .iter()
            .map(|p| SamplePoint::new(p.position[0], p.position[1], p.position[2], p.radius))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_extraction() -> Extraction {
        Extraction {
            sections: vec![SectionRecord {
                id: SectionId(1),
                parent: None,
                children: vec![],
                neurite_type: NeuriteType::ApicalDendrite,
                points: vec![SamplePoint::new(1.5, -2.0, 0.25, 0.5)],
            }],
            soma: SomaRecord {
                id: SectionId(0),
                points: vec![[0.0, 0.0, 0.0]],
                center: [0.0, 0.0, 0.0],
                radius: 5.0,
            },
        }
    }

    #[test]
    fn test_key_order_and_indentation() {
        let json = encode_structured(&sample_extraction())
            .to_json_string()
            .unwrap();
        assert!(json.starts_with("{\n  \"sections\": [\n"));
        let id = json.find("\"id\"").unwrap();
        let parent = json.find("\"parent\"").unwrap();
        let children = json.find("\"children\"").unwrap();
        let typename = json.find("\"typename\"").unwrap();
        let typevalue = json.find("\"typevalue\"").unwrap();
        let points = json.find("\"points\"").unwrap();
        assert!(id < parent && parent < children && children < typename);
        assert!(typename < typevalue && typevalue < points);
        assert!(json.find("\"sections\"").unwrap() < json.find("\"soma\"").unwrap());
        assert!(json.is_ascii());
    }

    #[test]
    fn test_soma_center_is_optional() {
        let extraction = sample_extraction();
        let without = encode_structured(&extraction).to_json_string().unwrap();
        assert!(!without.contains("\"center\""));
        let with = StructuredEncoder::new(true)
            .encode(&extraction)
            .to_json_string()
            .unwrap();
        assert!(with.contains("\"center\""));
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let mut document = encode_structured(&sample_extraction());
        document.sections[0].typename = "axon".to_string();
        assert!(matches!(
            document.to_extraction(),
            Err(StructuredError::TypeMismatch { typevalue: 1, .. })
        ));
    }

    #[test]
    fn test_not_a_soma_is_rejected() {
        let mut document = encode_structured(&sample_extraction());
        document.soma.type_name = "axon".to_string();
        assert!(matches!(
            document.to_extraction(),
            Err(StructuredError::NotASoma(_))
        ));
    }
}
