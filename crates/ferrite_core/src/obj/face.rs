//! Face record parsing (`f v/vt/vn ...`).

use super::scanner::{is_line_end, is_space, parse_int};

/// Attribute slot a number in a vertex record is written to.
const SLOT_POSITION: usize = 0;
const SLOT_TEXCOORD: usize = 1;
const SLOT_NORMAL: usize = 2;

/// 0-based index lists of one face record, before a material is attached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceRecord {
    pub vertices: Vec<u32>,
    pub texture_coords: Vec<u32>,
    pub normals: Vec<u32>,
}

/// A token of a face record that could not be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FaceTokenError {
    /// More than two `/` separators inside one vertex record.
    SlotOutOfRange { slot: usize, token: String },
    /// Not a positive integer.
    Malformed { token: String },
}

/// Parse the text following `f` into index lists.
///
/// `has_texture_coords`/`has_normals` say whether the model declared any
/// texture coordinates or normals so far. When only normals exist, a single
/// `/` jumps straight to the normal slot, so `1/3` means position 1,
/// normal 3. A doubled `//` always skips the texture coordinate slot.
///
/// Bad tokens are returned alongside the record; parsing continues past them.
pub fn parse_face_record(
    line: &[u8],
    has_texture_coords: bool,
    has_normals: bool,
) -> (FaceRecord, Vec<FaceTokenError>) {
    let mut record = FaceRecord::default();
    let mut errors = Vec::new();
    let mut slot = SLOT_POSITION;
    let mut i = 0;

    while i < line.len() {
        let b = line[i];
        if is_line_end(b) {
            break;
        }

        if b == b'/' {
            if line.get(i + 1) == Some(&b'/') {
                slot += 2;
                i += 2;
                continue;
            }
            if slot == SLOT_POSITION && !has_texture_coords && has_normals {
                slot = SLOT_TEXCOORD;
            }
            slot += 1;
            i += 1;
            continue;
        }

        if is_space(b) {
            slot = SLOT_POSITION;
            i += 1;
            continue;
        }

        let (value, consumed) = parse_int(&line[i..]);
        if consumed == 0 {
            let len = token_len(&line[i..]);
            errors.push(FaceTokenError::Malformed {
                token: String::from_utf8_lossy(&line[i..i + len]).into_owned(),
            });
            i += len;
            continue;
        }

        let token = &line[i..i + consumed];
        i += consumed;

        // OBJ indices are 1-based; 0 means "not recorded"
        let index = match value {
            Some(0) => continue,
            Some(v) if v > 0 && v - 1 <= i64::from(u32::MAX) => (v - 1) as u32,
            _ => {
                errors.push(FaceTokenError::Malformed {
                    token: String::from_utf8_lossy(token).into_owned(),
                });
                continue;
            }
        };

        match slot {
            SLOT_POSITION => record.vertices.push(index),
            SLOT_TEXCOORD => record.texture_coords.push(index),
            SLOT_NORMAL => record.normals.push(index),
            _ => errors.push(FaceTokenError::SlotOutOfRange {
                slot,
                token: String::from_utf8_lossy(token).into_owned(),
            }),
        }
    }

    (record, errors)
}

/// Length of the run up to the next separator.
fn token_len(text: &[u8]) -> usize {
    text.iter()
        .position(|&b| b == b'/' || is_space(b) || is_line_end(b))
        .unwrap_or(text.len())
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str, vt: bool, vn: bool) -> FaceRecord {
        let (record, errors) = parse_face_record(line.as_bytes(), vt, vn);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        record
    }

    #[test]
    fn test_positions_only() {
        let record = parse(" 1 2 3", false, false);
        assert_eq!(record.vertices, vec![0, 1, 2]);
        assert!(record.texture_coords.is_empty());
        assert!(record.normals.is_empty());
    }

    #[test]
    fn test_full_triples() {
        let record = parse(" 1/2/3 4/5/6 7/8/9", true, true);
        assert_eq!(record.vertices, vec![0, 3, 6]);
        assert_eq!(record.texture_coords, vec![1, 4, 7]);
        assert_eq!(record.normals, vec![2, 5, 8]);
    }

    #[test]
    fn test_double_slash_without_texcoords() {
        let record = parse(" 1//3 4//6", false, true);
        assert_eq!(record.vertices, vec![0, 3]);
        assert!(record.texture_coords.is_empty());
        assert_eq!(record.normals, vec![2, 5]);
    }

    #[test]
    fn test_double_slash_with_texcoords() {
        let record = parse(" 1//3 4//6", true, true);
        assert_eq!(record.vertices, vec![0, 3]);
        assert!(record.texture_coords.is_empty());
        assert_eq!(record.normals, vec![2, 5]);
    }

    #[test]
    fn test_single_slash_skips_to_normal_without_texcoords() {
        let record = parse(" 1/3 4/6", false, true);
        assert_eq!(record.vertices, vec![0, 3]);
        assert!(record.texture_coords.is_empty());
        assert_eq!(record.normals, vec![2, 5]);
    }

    #[test]
    fn test_position_texcoord_pairs() {
        let record = parse(" 1/2 3/4 5/6", true, false);
        assert_eq!(record.vertices, vec![0, 2, 4]);
        assert_eq!(record.texture_coords, vec![1, 3, 5]);
        assert!(record.normals.is_empty());
    }

    #[test]
    fn test_zero_index_is_dropped() {
        let record = parse(" 0 2 0 4", false, false);
        assert_eq!(record.vertices, vec![1, 3]);
    }

    #[test]
    fn test_multi_digit_indices() {
        let record = parse("\t10/200/3000  42", true, true);
        assert_eq!(record.vertices, vec![9, 41]);
        assert_eq!(record.texture_coords, vec![199]);
        assert_eq!(record.normals, vec![2999]);
    }

    #[test]
    fn test_stops_at_carriage_return() {
        let record = parse(" 1 2 3\r", false, false);
        assert_eq!(record.vertices, vec![0, 1, 2]);
    }

    #[test]
    fn test_extra_slot_is_reported_and_skipped() {
        let (record, errors) = parse_face_record(b" 1/2/3/4 5/6/7", true, true);
        assert_eq!(record.vertices, vec![0, 4]);
        assert_eq!(record.texture_coords, vec![1, 5]);
        assert_eq!(record.normals, vec![2, 6]);
        assert_eq!(
            errors,
            vec![FaceTokenError::SlotOutOfRange {
                slot: 3,
                token: "4".to_string()
            }]
        );
    }

    #[test]
    fn test_malformed_tokens_are_reported() {
        let (record, errors) = parse_face_record(b" 1 abc 2 -3 4", false, false);
        assert_eq!(record.vertices, vec![0, 1, 3]);
        assert_eq!(
            errors,
            vec![
                FaceTokenError::Malformed {
                    token: "abc".to_string()
                },
                FaceTokenError::Malformed {
                    token: "-3".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_empty_record() {
        let record = parse("", false, false);
        assert_eq!(record, FaceRecord::default());
    }
}
