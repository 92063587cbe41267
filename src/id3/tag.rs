// Tag assembly: parsing buffers into tags, building tag buffers, merging
//
// Reading aggregates decoded frames into two views of the same data: `raw`
// keyed by frame identifier and the friendly entries keyed by alias.
// Writing always produces an ID3v2.3.0 tag regardless of what was read.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::field_mapping::{self, ResolvedKey};
use crate::id3::codec::{decode_fields, encode_fields};
use crate::id3::frames::{build_frame, split_frames, RawFrame};
use crate::id3::header;
use crate::id3::spec::FrameKind;
use crate::id3::value::FrameValue;
use crate::id3::TagError;

/// Tag content keyed by alias or raw identifier
pub type TagMap = BTreeMap<String, TagEntry>;

/// One or several values under a single tag key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagEntry {
    Single(FrameValue),
    Multiple(Vec<FrameValue>),
}

impl TagEntry {
    pub fn values(&self) -> &[FrameValue] {
        match self {
            TagEntry::Single(value) => std::slice::from_ref(value),
            TagEntry::Multiple(values) => values.as_slice(),
        }
    }

    pub fn into_values(self) -> Vec<FrameValue> {
        match self {
            TagEntry::Single(value) => vec![value],
            TagEntry::Multiple(values) => values,
        }
    }
}

/// A decoded tag: friendly entries plus the raw identifier view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tag {
    #[serde(flatten)]
    pub entries: TagMap,
    pub raw: TagMap,
}

impl Tag {
    pub fn new() -> Self {
        Tag::default()
    }

    /// Decode the first valid tag in the buffer, None when there is none
    ///
    /// Exactly the declared number of body bytes is parsed, so trailing
    /// audio data is never misread as frames.
    pub fn from_buffer(buffer: &[u8]) -> Option<Tag> {
        let offset = header::locate_tag(buffer)?;
        let version = buffer[offset + 3];
        let declared = header::decode_synchsafe(&[
            buffer[offset + 6],
            buffer[offset + 7],
            buffer[offset + 8],
            buffer[offset + 9],
        ]) as usize;

        let start = offset + header::HEADER_SIZE;
        let end = (start + declared).min(buffer.len());
        Some(Tag::from_frame_sequence(&buffer[start..end], version))
    }

    /// Decode a bare frame sequence (a tag body without its header)
    ///
    /// Chapter sub-tags use this directly with version 3 identifiers.
    pub fn from_frame_sequence(body: &[u8], version: u8) -> Tag {
        let mut tag = Tag::new();
        for frame in split_frames(body, version) {
            tag.collect_frame(&frame, version);
        }
        tag
    }

    fn collect_frame(&mut self, frame: &RawFrame, version: u8) {
        let Some(kind) = FrameKind::from_identifier(&frame.identifier, version) else {
            return;
        };
        let value = FrameValue::from_fields(kind, &decode_fields(kind.spec(), &frame.body));

        match kind {
            FrameKind::Text => {
                insert(&mut self.raw, &frame.identifier, value.clone(), false);
                if let Some(alias) = field_mapping::text_alias(&frame.identifier, version) {
                    insert(&mut self.entries, alias, value, false);
                }
            }
            FrameKind::Url => {
                let url_frame = field_mapping::url_frame_by_identifier(&frame.identifier, version);
                let multiple = url_frame.map(|f| f.multiple).unwrap_or(false);
                insert(&mut self.raw, &frame.identifier, value.clone(), multiple);
                if let Some(url_frame) = url_frame {
                    insert(&mut self.entries, url_frame.alias, value, multiple);
                }
            }
            _ => {
                let special = field_mapping::special_by_identifier(&frame.identifier, version);
                let multiple = special.map(|f| f.multiple).unwrap_or(false);
                insert(&mut self.raw, &frame.identifier, value.clone(), multiple);
                if let Some(special) = special {
                    insert(&mut self.entries, special.alias, value, multiple);
                }
            }
        }
    }

    /// Encode back into a bare frame sequence
    ///
    /// Friendly entries win when both views are populated; a tag decoded
    /// from bytes carries the same values in both.
    pub fn to_frame_sequence(&self) -> Result<Vec<u8>, TagError> {
        if self.entries.is_empty() {
            frames_from_map(&self.raw)
        } else {
            frames_from_map(&self.entries)
        }
    }

    /// Build a tag map from a JSON object, resolving each key's frame kind
    ///
    /// Keys may be friendly aliases or raw v2.3 identifiers; unknown keys
    /// are skipped. A "raw" key is treated as the nested identifier view.
    pub fn from_json(value: &serde_json::Value) -> Result<Tag, TagError> {
        let object = value
            .as_object()
            .ok_or_else(|| TagError::InvalidValue("tag value must be an object".into()))?;
        let mut tag = Tag::new();
        for (key, value) in object {
            if key == "raw" {
                let nested = Tag::from_json(value)?;
                tag.raw.extend(nested.entries);
                continue;
            }
            if let Some(entry) = entry_from_json(key, value)? {
                tag.entries.insert(key.clone(), entry);
            }
        }
        Ok(tag)
    }
}

fn insert(map: &mut TagMap, key: &str, value: FrameValue, multiple: bool) {
    if multiple {
        let entry = map
            .entry(key.to_string())
            .or_insert_with(|| TagEntry::Multiple(Vec::new()));
        as_multiple(entry).push(value);
    } else {
        map.insert(key.to_string(), TagEntry::Single(value));
    }
}

/// Normalize an entry to its sequence form, wrapping a single value
fn as_multiple(entry: &mut TagEntry) -> &mut Vec<FrameValue> {
    if let TagEntry::Single(value) = entry {
        let value = value.clone();
        *entry = TagEntry::Multiple(vec![value]);
    }
    match entry {
        TagEntry::Multiple(values) => values,
        TagEntry::Single(_) => unreachable!(),
    }
}

/// Parse one input map entry into typed values for its resolved kind
pub fn entry_from_json(
    key: &str,
    value: &serde_json::Value,
) -> Result<Option<TagEntry>, TagError> {
    let Some(resolved) = field_mapping::resolve_key(key) else {
        return Ok(None);
    };
    let kind = match resolved {
        ResolvedKey::Text(_) => FrameKind::Text,
        ResolvedKey::Url(_) => FrameKind::Url,
        ResolvedKey::Special(frame) => frame.kind,
    };
    let entry = match value {
        serde_json::Value::Array(elements) => {
            let mut values = Vec::with_capacity(elements.len());
            for element in elements {
                values.push(FrameValue::from_json(kind, element)?);
            }
            TagEntry::Multiple(values)
        }
        _ => TagEntry::Single(FrameValue::from_json(kind, value)?),
    };
    Ok(Some(entry))
}

/// Encode a tag map into a concatenated v2.3 frame sequence
///
/// Unknown keys are skipped; a value that does not fit its key's frame
/// kind is a caller error, not a decode degradation.
pub fn frames_from_map(map: &TagMap) -> Result<Vec<u8>, TagError> {
    let mut frames = Vec::new();
    for (key, entry) in map {
        let Some(resolved) = field_mapping::resolve_key(key) else {
            continue;
        };
        match resolved {
            ResolvedKey::Text(identifier) => {
                let TagEntry::Single(value @ FrameValue::Text(_)) = entry else {
                    return Err(TagError::InvalidValue(format!(
                        "'{}' expects a single text value",
                        key
                    )));
                };
                frames.extend(encode_frame(identifier, value)?);
            }
            ResolvedKey::Url(url_frame) => {
                if !url_frame.multiple && matches!(entry, TagEntry::Multiple(_)) {
                    return Err(TagError::InvalidValue(format!(
                        "'{}' does not repeat",
                        key
                    )));
                }
                // repeated URL lists are deduplicated before writing
                let mut seen: Vec<&FrameValue> = Vec::new();
                for value in entry.values() {
                    if !matches!(value, FrameValue::Url(_)) {
                        return Err(TagError::InvalidValue(format!(
                            "'{}' expects URL values",
                            key
                        )));
                    }
                    if seen.contains(&value) {
                        continue;
                    }
                    seen.push(value);
                    frames.extend(encode_frame(url_frame.identifier, value)?);
                }
            }
            ResolvedKey::Special(special) => {
                if !special.multiple && matches!(entry, TagEntry::Multiple(_)) {
                    return Err(TagError::InvalidValue(format!(
                        "'{}' does not repeat",
                        key
                    )));
                }
                for value in entry.values() {
                    if value.kind() != special.kind {
                        return Err(TagError::InvalidValue(format!(
                            "'{}' does not fit frame kind {:?}",
                            key, special.kind
                        )));
                    }
                    frames.extend(encode_frame(special.identifier, value)?);
                }
            }
        }
    }
    Ok(frames)
}

fn encode_frame(identifier: &str, value: &FrameValue) -> Result<Vec<u8>, TagError> {
    let body = encode_fields(value.kind().spec(), &value.to_fields())?;
    Ok(build_frame(identifier, &body))
}

/// Build a complete tag buffer: v2.3.0 header plus encoded frames
pub fn create_tag(map: &TagMap) -> Result<Vec<u8>, TagError> {
    let frames = frames_from_map(map)?;
    let mut buffer = header::build_header(frames.len() as u32).to_vec();
    buffer.extend(frames);
    Ok(buffer)
}

/// Merge an incoming raw map into an existing one
///
/// Repeatable kinds with a comparison key overwrite the matching element in
/// place and append the rest; repeatable kinds without one always append.
/// Everything else is replaced outright.
pub fn merge_raw(existing: &mut TagMap, incoming: TagMap) {
    for (key, entry) in incoming {
        if !field_mapping::is_multiple(&key, 3) {
            existing.insert(key, entry);
            continue;
        }
        let compare_key = field_mapping::compare_key(&key);
        let current = existing
            .entry(key)
            .or_insert_with(|| TagEntry::Multiple(Vec::new()));
        let values = as_multiple(current);
        for value in entry.into_values() {
            let position = compare_key.and_then(|_| {
                let needle = value.compare_key()?;
                values
                    .iter()
                    .position(|existing| existing.compare_key() == Some(needle))
            });
            match position {
                Some(index) => values[index] = value,
                None => values.push(value),
            }
        }
    }
}

/// Resolve friendly keys in an input map to their raw identifiers
pub fn normalize_to_raw(map: &TagMap) -> TagMap {
    let mut raw = TagMap::new();
    for (key, entry) in map {
        let identifier = match field_mapping::resolve_key(key) {
            Some(ResolvedKey::Text(identifier)) => identifier,
            Some(ResolvedKey::Url(frame)) => frame.identifier,
            Some(ResolvedKey::Special(frame)) => frame.identifier,
            None => continue,
        };
        raw.insert(identifier.to_string(), entry.clone());
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::value::{
        Chapter, Comment, Lyrics, Picture, PictureType, Popularimeter, Private, UserDefinedText,
    };

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn single(value: FrameValue) -> TagEntry {
        TagEntry::Single(value)
    }

    #[test]
    fn test_empty_tag_is_bare_header() {
        let buffer = create_tag(&TagMap::new()).unwrap();
        assert_eq!(
            buffer,
            vec![0x49, 0x44, 0x33, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_read_empty_tag() {
        let buffer = create_tag(&TagMap::new()).unwrap();
        let tag = Tag::from_buffer(&buffer).unwrap();
        assert!(tag.entries.is_empty());
        assert!(tag.raw.is_empty());
    }

    #[test]
    fn test_text_frame_round_trip() {
        let mut tags = TagMap::new();
        tags.insert("title".into(), single(FrameValue::Text("asdfghjÄÖP".into())));
        tags.insert("album".into(), single(FrameValue::Text("naBGZwssg".into())));

        let buffer = create_tag(&tags).unwrap();
        let tag = Tag::from_buffer(&buffer).unwrap();
        assert_eq!(
            tag.entries.get("title"),
            Some(&single(FrameValue::Text("asdfghjÄÖP".into())))
        );
        assert_eq!(
            tag.raw.get("TALB"),
            Some(&single(FrameValue::Text("naBGZwssg".into())))
        );
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let mut tags = TagMap::new();
        tags.insert("title".into(), single(FrameValue::Text("abc".into())));
        tags.insert("notfound".into(), single(FrameValue::Text("zzz".into())));

        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        assert_eq!(tag.entries.len(), 1);
        assert_eq!(tag.raw.len(), 1);
    }

    #[test]
    fn test_corrupt_magic_yields_nothing() {
        let mut tags = TagMap::new();
        tags.insert("title".into(), single(FrameValue::Text("abc".into())));
        let mut buffer = create_tag(&tags).unwrap();
        buffer[0] = 0x99;
        assert_eq!(Tag::from_buffer(&buffer), None);
    }

    #[test]
    fn test_broken_frame_identifier_is_skipped() {
        let mut tags = TagMap::new();
        tags.insert("title".into(), single(FrameValue::Text("abc".into())));
        tags.insert("album".into(), single(FrameValue::Text("xyz".into())));
        let mut buffer = create_tag(&tags).unwrap();
        // first frame is TALB (sorted order); corrupt its identifier
        buffer[10] = 0x99;

        let tag = Tag::from_buffer(&buffer).unwrap();
        assert_eq!(tag.entries.get("album"), None);
        assert_eq!(
            tag.entries.get("title"),
            Some(&single(FrameValue::Text("abc".into())))
        );
    }

    #[test]
    fn test_oversized_declared_tag_size_still_reads() {
        let mut tags = TagMap::new();
        tags.insert("title".into(), single(FrameValue::Text("abc".into())));
        let mut buffer = create_tag(&tags).unwrap();
        buffer[9] += 100;

        let tag = Tag::from_buffer(&buffer).unwrap();
        assert_eq!(
            tag.entries.get("title"),
            Some(&single(FrameValue::Text("abc".into())))
        );
    }

    #[test]
    fn test_undersized_declared_tag_size_drops_tail_frames() {
        let mut tags = TagMap::new();
        tags.insert("album".into(), single(FrameValue::Text("naBGZwssg".into())));
        tags.insert("title".into(), single(FrameValue::Text("asdfghjÄÖP".into())));
        let mut buffer = create_tag(&tags).unwrap();
        // shrink the declared size below the second frame's end
        buffer[9] -= 25;

        let tag = Tag::from_buffer(&buffer).unwrap();
        assert_eq!(
            tag.entries.get("album"),
            Some(&single(FrameValue::Text("naBGZwssg".into())))
        );
        assert_eq!(tag.entries.get("title"), None);
    }

    #[test]
    fn test_corrupted_frame_size_keeps_earlier_frames() {
        let mut tags = TagMap::new();
        tags.insert("album".into(), single(FrameValue::Text("first".into())));
        tags.insert("title".into(), single(FrameValue::Text("second".into())));
        let mut buffer = create_tag(&tags).unwrap();
        // grow the second frame's declared size past the end of the buffer;
        // TALB body is 13 bytes (encoding byte + BOM + 2*5), so the TIT2
        // size byte sits at 10 + 10 + 13 + 7
        let title_size_offset = 10 + 10 + 13 + 7;
        buffer[title_size_offset] = 0xFF;

        let tag = Tag::from_buffer(&buffer).unwrap();
        assert_eq!(
            tag.entries.get("album"),
            Some(&single(FrameValue::Text("first".into())))
        );
        assert_eq!(tag.entries.get("title"), None);
    }

    #[test]
    fn test_undersized_frame_truncates_text_and_resumes() {
        // TIT2 carries 6 body bytes but declares only 4; the splitter must
        // cut the text at the declared boundary and pick up TALB right after
        let mut tag_body = build_frame("TIT2", &[0x00, b'a', b'b', b'c', b'd', b'e']);
        tag_body[7] = 4;
        tag_body.truncate(10 + 4);
        tag_body.extend(build_frame("TALB", &[0x00, b'x', b'y']));

        let mut full = header::build_header(tag_body.len() as u32).to_vec();
        full.extend(tag_body);

        let tag = Tag::from_buffer(&full).unwrap();
        assert_eq!(
            tag.entries.get("title"),
            Some(&single(FrameValue::Text("abc".into())))
        );
        assert_eq!(
            tag.entries.get("album"),
            Some(&single(FrameValue::Text("xy".into())))
        );
    }

    #[test]
    fn test_popularimeter_known_bytes() {
        let mut tags = TagMap::new();
        tags.insert(
            "popularimeter".into(),
            single(FrameValue::Popularimeter(Popularimeter {
                email: "mail@example.com".into(),
                rating: 192,
                counter: 12,
            })),
        );
        let expected = hex(
            "49443303000000000020504F504D0000001600006D61696C406578616D706C652E636F6D00C00000000C",
        );
        assert_eq!(create_tag(&tags).unwrap(), expected);

        let tag = Tag::from_buffer(&expected).unwrap();
        let TagEntry::Multiple(values) = tag.entries.get("popularimeter").unwrap() else {
            panic!("popularimeter aggregates into a sequence");
        };
        assert_eq!(
            values[0],
            FrameValue::Popularimeter(Popularimeter {
                email: "mail@example.com".into(),
                rating: 192,
                counter: 12,
            })
        );
    }

    #[test]
    fn test_comment_known_bytes() {
        let mut tags = TagMap::new();
        tags.insert(
            "comment".into(),
            single(FrameValue::Comment(Comment {
                language: "deu".into(),
                description: "Haiwsää#".into(),
                text: "askdh ashd olahs elowz dlouaish dkajh".into(),
            })),
        );
        let expected = hex(concat!(
            "4944330300000000006E434F4D4D00000064000001646575",
            "FFFE48006100690077007300E400E400230000",
            "00FFFE610073006B00640068002000610073006800640020006F006C00610068",
            "007300200065006C006F0077007A00200064006C006F00750061006900730068",
            "00200064006B0061006A006800"
        ));
        assert_eq!(create_tag(&tags).unwrap(), expected);

        let tag = Tag::from_buffer(&expected).unwrap();
        let TagEntry::Multiple(values) = tag.raw.get("COMM").unwrap() else {
            panic!("comments aggregate into a sequence");
        };
        assert_eq!(
            values[0],
            FrameValue::Comment(Comment {
                language: "deu".into(),
                description: "Haiwsää#".into(),
                text: "askdh ashd olahs elowz dlouaish dkajh".into(),
            })
        );
    }

    #[test]
    fn test_lyrics_round_trip() {
        let lyrics = Lyrics {
            language: "deu".into(),
            description: "Haiwsää#".into(),
            text: "askdh ashd olahs elowz dlouaish dkajh".into(),
        };
        let mut tags = TagMap::new();
        tags.insert(
            "unsynchronisedLyrics".into(),
            single(FrameValue::Lyrics(lyrics.clone())),
        );

        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        assert_eq!(
            tag.entries.get("unsynchronisedLyrics"),
            Some(&single(FrameValue::Lyrics(lyrics)))
        );
    }

    #[test]
    fn test_picture_known_bytes() {
        let mut tags = TagMap::new();
        tags.insert(
            "image".into(),
            single(FrameValue::Picture(Picture {
                mime: "jpeg".into(),
                picture_type: Some(PictureType {
                    id: 3,
                    name: "front cover".into(),
                }),
                description: Some("asdf".into()),
                image: hex("5B307836312C20307836322C20307836332C20307836345D"),
            })),
        );
        let expected = hex(concat!(
            "4944330300000000003B4150494300000031000001696D6167652F6A706567",
            "0003FFFE6100730064006600000",
            "05B307836312C20307836322C20307836332C20307836345D"
        ));
        assert_eq!(create_tag(&tags).unwrap(), expected);
    }

    #[test]
    fn test_picture_without_description() {
        // Latin-1 encoding byte, empty description region
        let buffer = hex("494433030000000000264150494300000012000000696D6167652F6A70656700030061626364");
        let tag = Tag::from_buffer(&buffer).unwrap();
        let Some(TagEntry::Single(FrameValue::Picture(picture))) = tag.entries.get("image") else {
            panic!("picture frame expected");
        };
        assert_eq!(picture.mime, "jpeg");
        assert_eq!(picture.picture_type.as_ref().unwrap().id, 3);
        assert_eq!(picture.description, None);
        assert_eq!(picture.image, b"abcd");
    }

    #[test]
    fn test_user_defined_text_array_round_trip() {
        let first = UserDefinedText {
            description: "abc".into(),
            value: "deg".into(),
        };
        let second = UserDefinedText {
            description: "abcd".into(),
            value: "efgh".into(),
        };
        let mut tags = TagMap::new();
        tags.insert(
            "userDefinedText".into(),
            TagEntry::Multiple(vec![
                FrameValue::UserDefinedText(first.clone()),
                FrameValue::UserDefinedText(second.clone()),
            ]),
        );

        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        assert_eq!(
            tag.raw.get("TXXX"),
            Some(&TagEntry::Multiple(vec![
                FrameValue::UserDefinedText(first),
                FrameValue::UserDefinedText(second),
            ]))
        );
    }

    #[test]
    fn test_private_multiple_owners_round_trip() {
        let values = vec![
            FrameValue::Private(Private {
                owner_identifier: "AbC".into(),
                data: b"asdoahwdiohawdaw".to_vec(),
            }),
            FrameValue::Private(Private {
                owner_identifier: "AbCSSS".into(),
                data: vec![0x01, 0x02, 0x05],
            }),
        ];
        let mut tags = TagMap::new();
        tags.insert("private".into(), TagEntry::Multiple(values.clone()));

        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        assert_eq!(tag.entries.get("private"), Some(&TagEntry::Multiple(values)));
    }

    #[test]
    fn test_chapter_round_trip_with_subframes() {
        let mut nested = Tag::new();
        nested
            .entries
            .insert("title".into(), single(FrameValue::Text("abcdef".into())));
        nested
            .entries
            .insert("artist".into(), single(FrameValue::Text("akshdas".into())));

        let chapter = Chapter {
            element_id: "Hey!".into(),
            start_time_ms: 5000,
            end_time_ms: 8000,
            start_offset_bytes: Some(123),
            end_offset_bytes: Some(456),
            tags: Some(nested),
        };
        let mut tags = TagMap::new();
        tags.insert(
            "chapter".into(),
            TagEntry::Multiple(vec![FrameValue::Chapter(chapter)]),
        );

        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        let Some(TagEntry::Multiple(chapters)) = tag.entries.get("chapter") else {
            panic!("chapter frame expected");
        };
        let FrameValue::Chapter(decoded) = &chapters[0] else {
            panic!("chapter value expected");
        };
        assert_eq!(decoded.element_id, "Hey!");
        assert_eq!(decoded.start_time_ms, 5000);
        assert_eq!(decoded.end_time_ms, 8000);
        assert_eq!(decoded.start_offset_bytes, Some(123));
        assert_eq!(decoded.end_offset_bytes, Some(456));

        let nested = decoded.tags.as_ref().unwrap();
        assert_eq!(
            nested.entries.get("title"),
            Some(&single(FrameValue::Text("abcdef".into())))
        );
        assert_eq!(
            nested.raw.get("TPE1"),
            Some(&single(FrameValue::Text("akshdas".into())))
        );
    }

    #[test]
    fn test_url_frames_deduplicate() {
        let mut tags = TagMap::new();
        tags.insert(
            "commercialUrl".into(),
            TagEntry::Multiple(vec![
                FrameValue::Url("https://a.example".into()),
                FrameValue::Url("https://a.example".into()),
                FrameValue::Url("https://b.example".into()),
            ]),
        );

        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        assert_eq!(
            tag.raw.get("WCOM"),
            Some(&TagEntry::Multiple(vec![
                FrameValue::Url("https://a.example".into()),
                FrameValue::Url("https://b.example".into()),
            ]))
        );
    }

    #[test]
    fn test_user_defined_url_round_trip() {
        let value = crate::id3::value::UserDefinedUrl {
            description: "homepage".into(),
            url: "https://example.com/a".into(),
        };
        let mut tags = TagMap::new();
        tags.insert(
            "userDefinedUrl".into(),
            single(FrameValue::UserDefinedUrl(value.clone())),
        );

        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        assert_eq!(
            tag.raw.get("WXXX"),
            Some(&TagEntry::Multiple(vec![FrameValue::UserDefinedUrl(value)]))
        );
    }

    #[test]
    fn test_singleton_url_alias_round_trip() {
        let mut tags = TagMap::new();
        tags.insert(
            "copyrightUrl".into(),
            single(FrameValue::Url("https://example.com/legal".into())),
        );

        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        assert_eq!(
            tag.entries.get("copyrightUrl"),
            Some(&single(FrameValue::Url("https://example.com/legal".into())))
        );
        assert!(tag.raw.contains_key("WCOP"));
    }

    #[test]
    fn test_read_v22_text_frame() {
        // v2.2 header plus a TT2 frame with a 6-byte header
        let mut body = b"TT2".to_vec();
        body.extend_from_slice(&[0x00, 0x00, 0x04]);
        body.extend_from_slice(&[0x00, b'a', b'b', b'c']);

        let mut buffer = vec![b'I', b'D', b'3', 0x02, 0x00, 0x00];
        buffer.extend(header::encode_synchsafe(body.len() as u32));
        buffer.extend(body);

        let tag = Tag::from_buffer(&buffer).unwrap();
        assert_eq!(
            tag.entries.get("title"),
            Some(&single(FrameValue::Text("abc".into())))
        );
        assert_eq!(
            tag.raw.get("TT2"),
            Some(&single(FrameValue::Text("abc".into())))
        );
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let mut tags = TagMap::new();
        tags.insert("comment".into(), single(FrameValue::Text("wrong".into())));
        assert!(create_tag(&tags).is_err());

        let mut tags = TagMap::new();
        tags.insert(
            "image".into(),
            TagEntry::Multiple(vec![
                FrameValue::Picture(Picture {
                    mime: "png".into(),
                    picture_type: None,
                    description: None,
                    image: vec![],
                }),
                FrameValue::Picture(Picture {
                    mime: "png".into(),
                    picture_type: None,
                    description: None,
                    image: vec![],
                }),
            ]),
        );
        assert!(create_tag(&tags).is_err());
    }

    #[test]
    fn test_merge_overwrites_by_comparison_key() {
        let mut existing = TagMap::new();
        existing.insert(
            "TXXX".into(),
            TagEntry::Multiple(vec![
                FrameValue::UserDefinedText(UserDefinedText {
                    description: "a".into(),
                    value: "1".into(),
                }),
                FrameValue::UserDefinedText(UserDefinedText {
                    description: "b".into(),
                    value: "2".into(),
                }),
            ]),
        );

        let mut incoming = TagMap::new();
        incoming.insert(
            "TXXX".into(),
            single(FrameValue::UserDefinedText(UserDefinedText {
                description: "a".into(),
                value: "9".into(),
            })),
        );
        merge_raw(&mut existing, incoming);

        assert_eq!(
            existing.get("TXXX"),
            Some(&TagEntry::Multiple(vec![
                FrameValue::UserDefinedText(UserDefinedText {
                    description: "a".into(),
                    value: "9".into(),
                }),
                FrameValue::UserDefinedText(UserDefinedText {
                    description: "b".into(),
                    value: "2".into(),
                }),
            ]))
        );

        let mut incoming = TagMap::new();
        incoming.insert(
            "TXXX".into(),
            single(FrameValue::UserDefinedText(UserDefinedText {
                description: "c".into(),
                value: "3".into(),
            })),
        );
        merge_raw(&mut existing, incoming);
        assert_eq!(existing.get("TXXX").unwrap().values().len(), 3);
    }

    #[test]
    fn test_merge_without_comparison_key_appends() {
        let mut existing = TagMap::new();
        existing.insert(
            "COMM".into(),
            single(FrameValue::Comment(Comment {
                language: "eng".into(),
                description: "d".into(),
                text: "old".into(),
            })),
        );

        let mut incoming = TagMap::new();
        incoming.insert(
            "COMM".into(),
            single(FrameValue::Comment(Comment {
                language: "eng".into(),
                description: "d".into(),
                text: "new".into(),
            })),
        );
        merge_raw(&mut existing, incoming);
        assert_eq!(existing.get("COMM").unwrap().values().len(), 2);
    }

    #[test]
    fn test_merge_singleton_overwrites() {
        let mut existing = TagMap::new();
        existing.insert("TIT2".into(), single(FrameValue::Text("old".into())));

        let mut incoming = TagMap::new();
        incoming.insert("TIT2".into(), single(FrameValue::Text("new".into())));
        merge_raw(&mut existing, incoming);
        assert_eq!(
            existing.get("TIT2"),
            Some(&single(FrameValue::Text("new".into())))
        );
    }

    #[test]
    fn test_normalize_to_raw() {
        let mut map = TagMap::new();
        map.insert("title".into(), single(FrameValue::Text("t".into())));
        map.insert("notfound".into(), single(FrameValue::Text("x".into())));
        let raw = normalize_to_raw(&map);
        assert!(raw.contains_key("TIT2"));
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn test_from_json_resolves_kinds() {
        let json = serde_json::json!({
            "title": "abc",
            "comment": {"language": "eng", "description": "d", "text": "t"},
            "userDefinedText": [{"description": "a", "value": "1"}],
            "unknownKey": "ignored",
        });
        let tag = Tag::from_json(&json).unwrap();
        assert_eq!(
            tag.entries.get("title"),
            Some(&single(FrameValue::Text("abc".into())))
        );
        assert!(matches!(
            tag.entries.get("comment"),
            Some(TagEntry::Single(FrameValue::Comment(_)))
        ));
        assert_eq!(tag.entries.get("userDefinedText").unwrap().values().len(), 1);
        assert!(!tag.entries.contains_key("unknownKey"));
    }

    #[test]
    fn test_serialized_shape_has_raw_view() {
        let mut tags = TagMap::new();
        tags.insert("title".into(), single(FrameValue::Text("abc".into())));
        let tag = Tag::from_buffer(&create_tag(&tags).unwrap()).unwrap();
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["title"], "abc");
        assert_eq!(json["raw"]["TIT2"], "abc");
    }
}
