// Generic frame body codec
//
// Interprets a frame body against the field tables in id3::spec, in both
// directions. Decoding never fails on malformed input: a body that runs out
// of bytes mid-table yields a partial field map, and a missing terminator
// leaves the field absent. Encoding writes every field, substituting
// deterministic defaults for absent values so the layout stays well-formed.

use crate::id3::spec::{DataType, EncodingSource, FieldSpec, WireType};
use crate::id3::tag::Tag;
use crate::id3::TagError;
use crate::utils::encoding::{self, TextEncoding};

/// A decoded field value, before per-kind typing
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(u64),
    Text(String),
    Binary(Vec<u8>),
    Frames(Tag),
}

/// Ordered collection of decoded fields, looked up by spec name
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    fields: Vec<(&'static str, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        FieldMap { fields: Vec::new() }
    }

    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.fields.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn number(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn binary(&self, name: &str) -> Option<&[u8]> {
        match self.get(name) {
            Some(FieldValue::Binary(b)) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn frames(&self, name: &str) -> Option<&Tag> {
        match self.get(name) {
            Some(FieldValue::Frames(tag)) => Some(tag),
            _ => None,
        }
    }
}

/// The encoding a field decodes/encodes its text with
fn resolve_encoding(source: EncodingSource, fields: &FieldMap) -> TextEncoding {
    match source {
        EncodingSource::Latin1 => TextEncoding::Latin1,
        EncodingSource::Field(name) => match fields.number(name) {
            Some(byte) => TextEncoding::from_byte(byte as u8),
            None => TextEncoding::Latin1,
        },
    }
}

/// Big-endian unsigned integer over up to 8 consumed bytes
fn decode_number(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take(8)
        .fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

/// Minimal big-endian representation of a number; zero encodes as one byte
fn encode_number(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(7);
    bytes[skip..].to_vec()
}

/// Split off a null-terminated value according to the encoding's width
///
/// Returns the value bytes (None when no terminator is found, leaving the
/// cursor untouched) and the remainder after the terminator. For 2-byte
/// terminators, a zero pair followed by another zero is ambiguous with an
/// embedded wide character; the boundary shifts forward one byte in that
/// case so the trailing pair stays the terminator.
fn split_terminated(buffer: &[u8], encoding: TextEncoding) -> (Option<&[u8]>, &[u8]) {
    if encoding.terminator_width() == 2 {
        let mut start = match buffer.windows(2).position(|pair| pair == [0x00, 0x00]) {
            Some(position) => position,
            None => return (None, buffer),
        };
        if buffer.len() > start + 2 && buffer[start + 2] == 0x00 {
            start += 1;
        }
        let remainder_start = (start + 2).min(buffer.len());
        (Some(&buffer[..start]), &buffer[remainder_start..])
    } else {
        match buffer.iter().position(|&b| b == 0x00) {
            Some(start) => (Some(&buffer[..start]), &buffer[start + 1..]),
            None => (None, buffer),
        }
    }
}

/// Decode a frame body into a field map, one table entry at a time
///
/// An exhausted cursor skips optional fields and ends the walk at the first
/// non-optional one; everything decoded so far is returned as-is.
pub fn decode_fields(spec: &[FieldSpec], body: &[u8]) -> FieldMap {
    let mut fields = FieldMap::new();
    let mut cursor = body;

    for field in spec {
        if cursor.is_empty() {
            if field.optional {
                continue;
            }
            break;
        }

        let encoding = resolve_encoding(field.encoding, &fields);
        let consumed: Option<&[u8]> = match field.wire {
            WireType::Fixed(Some(width)) => {
                if cursor.len() > width {
                    let (head, tail) = cursor.split_at(width);
                    cursor = tail;
                    Some(head)
                } else {
                    let head = cursor;
                    cursor = &[];
                    Some(head)
                }
            }
            WireType::Fixed(None) | WireType::Subframes => {
                let head = cursor;
                cursor = &[];
                Some(head)
            }
            WireType::NullTerminated => {
                let (value, rest) = split_terminated(cursor, encoding);
                cursor = rest;
                value
            }
        };

        let bytes = match consumed {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => continue,
        };

        let value = match field.data {
            DataType::Number => FieldValue::Number(decode_number(bytes)),
            DataType::Text => FieldValue::Text(encoding::decode_text(bytes, encoding)),
            DataType::Binary => FieldValue::Binary(bytes.to_vec()),
            DataType::Frames => FieldValue::Frames(Tag::from_frame_sequence(bytes, 3)),
        };
        fields.insert(field.name, value);
    }

    fields
}

/// Encode a field map back into a frame body
///
/// Absent fields contribute their default: numbers pad to the declared
/// width with zeroes, strings become empty, terminators are always written.
pub fn encode_fields(spec: &[FieldSpec], fields: &FieldMap) -> Result<Vec<u8>, TagError> {
    let mut body = Vec::new();

    for field in spec {
        let encoding = resolve_encoding(field.encoding, fields);
        let mut chunk = match fields.get(field.name) {
            Some(FieldValue::Number(n)) => encode_number(*n),
            Some(FieldValue::Text(s)) => encoding::encode_text(s, encoding),
            Some(FieldValue::Binary(b)) => b.clone(),
            Some(FieldValue::Frames(tag)) => tag.to_frame_sequence()?,
            None => Vec::new(),
        };

        if let WireType::Fixed(Some(width)) = field.wire {
            if chunk.len() < width {
                let mut padded = vec![0x00; width - chunk.len()];
                padded.extend(chunk);
                chunk = padded;
            }
        }
        body.extend(chunk);

        if field.wire == WireType::NullTerminated {
            body.extend_from_slice(encoding::terminator(encoding));
        }
    }

    Ok(body)
}
