// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Flat binary encoding.
//!
//! # Format
//! A row-major array of little-endian float32 values, 7 per record, with no header, length
//! prefix, padding or separator. The record count is `buffer length / 28`.
//!
//! - One record per neurite point, in walker section order then point order:
//!   `[section_id, type_code, x, y, z, radius, parent_id or -1]`
//! - One soma record, always last: `[soma_id, 1, center_x, center_y, center_z, radius, -1]`
//!
//! Ids are widened to float32, which represents integers exactly only up to 2^24. Encoding
//! fails with [`BinaryError::IdNotRepresentable`] rather than writing a rounded id.

use byteorder::{ByteOrder, LittleEndian};
use neuromorph_structures::SectionId;

use crate::{Extraction, SectionRecord, SomaRecord};

pub const FIELDS_PER_RECORD: usize = 7;

pub const BYTES_PER_RECORD: usize = FIELDS_PER_RECORD * size_of::<f32>(); // 28

/// Parent field of root sections and of the soma record
pub const NO_PARENT_SENTINEL: f32 = -1.0;

/// Type field of the soma record. A fixed constant, not taken from the neurite type table.
pub const SOMA_BINARY_TYPE_CODE: f32 = 1.0;

/// Largest id that survives the float32 widening exactly
pub const MAX_EXACT_ID: u32 = 1 << 24;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BinaryError {
    #[error("Id {id} is above {max} and cannot be stored exactly as float32")]
    IdNotRepresentable { id: SectionId, max: u32 },

    #[error("Buffer of {length} bytes is not a whole number of {record_size} byte records")]
    TruncatedBuffer { length: usize, record_size: usize },
}

/// One decoded 7-field record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryRecord {
    pub fields: [f32; FIELDS_PER_RECORD],
}

impl BinaryRecord {
    pub fn id(&self) -> f32 {
        self.fields[0]
    }

    pub fn type_code(&self) -> f32 {
        self.fields[1]
    }

    pub fn position(&self) -> [f32; 3] {
        [self.fields[2], self.fields[3], self.fields[4]]
    }

    pub fn radius(&self) -> f32 {
        self.fields[5]
    }

    /// Parent id, or `None` for the `-1` sentinel
    pub fn parent(&self) -> Option<f32> {
        if self.fields[6] == NO_PARENT_SENTINEL {
            None
        } else {
            Some(self.fields[6])
        }
    }
}

/// Encodes every neurite point followed by the soma record.
pub fn encode_binary(extraction: &Extraction) -> Result<Vec<u8>, BinaryError> {
    let record_count = extraction.expected_binary_record_count();
    let mut bytes = vec![0u8; record_count * BYTES_PER_RECORD];
    let mut write_index: usize = 0;

    for section in &extraction.sections {
        for fields in section_records(section)? {
            write_record(&mut bytes[write_index..write_index + BYTES_PER_RECORD], &fields);
            write_index += BYTES_PER_RECORD;
        }
    }

    let soma_fields = soma_record(&extraction.soma)?;
    write_record(&mut bytes[write_index..write_index + BYTES_PER_RECORD], &soma_fields);

    Ok(bytes)
}

/// Splits a buffer back into records.
pub fn decode_binary(bytes: &[u8]) -> Result<Vec<BinaryRecord>, BinaryError> {
    if bytes.len() % BYTES_PER_RECORD != 0 {
        return Err(BinaryError::TruncatedBuffer {
            length: bytes.len(),
            record_size: BYTES_PER_RECORD,
        });
    }
    Ok(bytes
        .chunks_exact(BYTES_PER_RECORD)
        .map(|chunk| {
            let mut fields = [0f32; FIELDS_PER_RECORD];
            LittleEndian::read_f32_into(chunk, &mut fields);
            BinaryRecord { fields }
        })
        .collect())
}

fn section_records(
    section: &SectionRecord,
) -> Result<impl Iterator<Item = [f32; FIELDS_PER_RECORD]> + '_, BinaryError> {
    let id = id_as_f32(section.id)?;
    let parent = match section.parent {
        Some(parent) => id_as_f32(parent)?,
        None => NO_PARENT_SENTINEL,
    };
    let type_code = section.type_code() as f32;
    Ok(section
        .points
        .iter()
        .map(move |p| [id, type_code, p.x, p.y, p.z, p.radius, parent]))
}

fn soma_record(soma: &SomaRecord) -> Result<[f32; FIELDS_PER_RECORD], BinaryError> {
    Ok([
        id_as_f32(soma.id)?,
        SOMA_BINARY_TYPE_CODE,
        soma.center[0],
        soma.center[1],
        soma.center[2],
        soma.radius,
        NO_PARENT_SENTINEL,
    ])
}

#[inline]
fn write_record(destination: &mut [u8], fields: &[f32; FIELDS_PER_RECORD]) {
    LittleEndian::write_f32_into(fields, destination);
}

fn id_as_f32(id: SectionId) -> Result<f32, BinaryError> {
    if id.value() > MAX_EXACT_ID {
        return Err(BinaryError::IdNotRepresentable {
            id,
            max: MAX_EXACT_ID,
        });
    }
    Ok(id.value() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromorph_structures::{NeuriteType, SamplePoint};

    fn soma(id: u32) -> SomaRecord {
        SomaRecord {
            id: SectionId(id),
            points: vec![[1.0, 2.0, 3.0]],
            center: [1.0, 2.0, 3.0],
            radius: 5.0,
        }
    }

    #[test]
    fn test_record_width() {
        assert_eq!(BYTES_PER_RECORD, 28);
    }

    #[test]
    fn test_little_endian_layout() {
        let extraction = Extraction {
            sections: vec![],
            soma: soma(2),
        };
        let bytes = encode_binary(&extraction).unwrap();
        assert_eq!(bytes.len(), BYTES_PER_RECORD);
        assert_eq!(&bytes[0..4], &2.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &SOMA_BINARY_TYPE_CODE.to_le_bytes());
        assert_eq!(&bytes[24..28], &(-1.0f32).to_le_bytes());
    }

    #[test]
    fn test_child_section_records_parent_id() {
        let extraction = Extraction {
            sections: vec![SectionRecord {
                id: SectionId(7),
                parent: Some(SectionId(0)),
                children: vec![],
                neurite_type: NeuriteType::BasalDendrite,
                points: vec![SamplePoint::new(1.0, 1.0, 1.0, 0.3)],
            }],
            soma: soma(9),
        };
        let records = decode_binary(&encode_binary(&extraction).unwrap()).unwrap();
        assert_eq!(records[0].fields, [7.0, 2.0, 1.0, 1.0, 1.0, 0.3, 0.0]);
        // id 0 is a real parent, never the sentinel
        assert_eq!(records[0].parent(), Some(0.0));
        assert_eq!(records[1].parent(), None);
    }

    #[test]
    fn test_large_ids_are_rejected() {
        let extraction = Extraction {
            sections: vec![],
            soma: soma(MAX_EXACT_ID + 1),
        };
        assert_eq!(
            encode_binary(&extraction).unwrap_err(),
            BinaryError::IdNotRepresentable {
                id: SectionId(MAX_EXACT_ID + 1),
                max: MAX_EXACT_ID
            }
        );
        let at_limit = Extraction {
            sections: vec![],
            soma: soma(MAX_EXACT_ID),
        };
        let records = decode_binary(&encode_binary(&at_limit).unwrap()).unwrap();
        assert_eq!(records[0].id(), MAX_EXACT_ID as f32);
    }

    #[test]
    fn test_truncated_buffer_is_rejected() {
        assert_eq!(
            decode_binary(&[0u8; 30]).unwrap_err(),
            BinaryError::TruncatedBuffer {
                length: 30,
                record_size: BYTES_PER_RECORD
            }
        );
        assert!(decode_binary(&[]).unwrap().is_empty());
    }
}
