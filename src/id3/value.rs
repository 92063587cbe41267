// Typed frame values
//
// One struct per frame kind instead of path-addressed maps; the codec's
// field tables stay declarative while results and inputs are plain types.

use serde::{Deserialize, Serialize};

use crate::id3::codec::{FieldMap, FieldValue};
use crate::id3::spec::FrameKind;
use crate::id3::tag::Tag;
use crate::id3::TagError;

/// Officially assigned picture types for attached pictures
const PICTURE_TYPES: [&str; 21] = [
    "other",
    "file icon",
    "other file icon",
    "front cover",
    "back cover",
    "leaflet page",
    "media",
    "lead artist",
    "artist",
    "conductor",
    "band",
    "composer",
    "lyricist",
    "recording location",
    "during recording",
    "during performance",
    "video screen capture",
    "a bright coloured fish",
    "illustration",
    "band logotype",
    "publisher logotype",
];

fn picture_type_name(id: u8) -> &'static str {
    PICTURE_TYPES
        .get(id as usize)
        .copied()
        .unwrap_or(PICTURE_TYPES[0])
}

/// Common mime types travel as their shorthand in decoded values
fn mime_shorthand(mime: &str) -> String {
    match mime {
        "image/jpeg" => "jpeg".to_string(),
        "image/png" => "png".to_string(),
        _ => mime.to_string(),
    }
}

fn mime_full(mime: &str) -> String {
    match mime {
        "jpeg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        _ => mime.to_string(),
    }
}

/// Binary fields travel as base64 strings in JSON
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDefinedText {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDefinedUrl {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureType {
    pub id: u8,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    #[serde(default)]
    pub mime: String,
    #[serde(rename = "type", default)]
    pub picture_type: Option<PictureType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "imageBuffer", with = "base64_bytes", default)]
    pub image: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lyrics {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popularimeter {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub counter: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Private {
    #[serde(rename = "ownerIdentifier", default)]
    pub owner_identifier: String,
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(rename = "elementID")]
    pub element_id: String,
    pub start_time_ms: u32,
    pub end_time_ms: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_offset_bytes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset_bytes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tag>,
}

/// A decoded frame value, keyed by its frame kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FrameValue {
    Text(String),
    Url(String),
    UserDefinedText(UserDefinedText),
    UserDefinedUrl(UserDefinedUrl),
    Picture(Picture),
    Lyrics(Lyrics),
    Comment(Comment),
    Popularimeter(Popularimeter),
    Private(Private),
    Chapter(Chapter),
}

impl FrameValue {
    /// The frame kind this value belongs to
    pub fn kind(&self) -> FrameKind {
        match self {
            FrameValue::Text(_) => FrameKind::Text,
            FrameValue::Url(_) => FrameKind::Url,
            FrameValue::UserDefinedText(_) => FrameKind::UserDefinedText,
            FrameValue::UserDefinedUrl(_) => FrameKind::UserDefinedUrl,
            FrameValue::Picture(_) => FrameKind::Picture,
            FrameValue::Lyrics(_) => FrameKind::Lyrics,
            FrameValue::Comment(_) => FrameKind::Comment,
            FrameValue::Popularimeter(_) => FrameKind::Popularimeter,
            FrameValue::Private(_) => FrameKind::Private,
            FrameValue::Chapter(_) => FrameKind::Chapter,
        }
    }

    /// Assemble a typed value from the codec's decoded fields
    pub fn from_fields(kind: FrameKind, fields: &FieldMap) -> FrameValue {
        let text = |name: &str| fields.text(name).unwrap_or_default().to_string();
        match kind {
            FrameKind::Text => FrameValue::Text(text("text")),
            FrameKind::Url => FrameValue::Url(text("url")),
            FrameKind::UserDefinedText => FrameValue::UserDefinedText(UserDefinedText {
                description: text("description"),
                value: text("value"),
            }),
            FrameKind::UserDefinedUrl => FrameValue::UserDefinedUrl(UserDefinedUrl {
                description: text("description"),
                url: text("url"),
            }),
            FrameKind::Picture => FrameValue::Picture(Picture {
                mime: mime_shorthand(&text("mime")),
                picture_type: fields.number("typeId").map(|id| PictureType {
                    id: id as u8,
                    name: picture_type_name(id as u8).to_string(),
                }),
                description: fields.text("description").map(str::to_string),
                image: fields.binary("imageBuffer").unwrap_or_default().to_vec(),
            }),
            FrameKind::Lyrics => FrameValue::Lyrics(Lyrics {
                language: text("language"),
                description: text("description"),
                text: text("text"),
            }),
            FrameKind::Comment => FrameValue::Comment(Comment {
                language: text("language"),
                description: text("description"),
                text: text("text"),
            }),
            FrameKind::Popularimeter => FrameValue::Popularimeter(Popularimeter {
                email: text("email"),
                rating: fields.number("rating").unwrap_or_default() as u8,
                counter: fields.number("counter").unwrap_or_default() as u32,
            }),
            FrameKind::Private => FrameValue::Private(Private {
                owner_identifier: text("ownerIdentifier"),
                data: fields.binary("data").unwrap_or_default().to_vec(),
            }),
            FrameKind::Chapter => FrameValue::Chapter(Chapter {
                element_id: text("elementID"),
                start_time_ms: fields.number("startTimeMs").unwrap_or_default() as u32,
                end_time_ms: fields.number("endTimeMs").unwrap_or_default() as u32,
                start_offset_bytes: fields.number("startOffsetBytes").map(|n| n as u32),
                end_offset_bytes: fields.number("endOffsetBytes").map(|n| n as u32),
                tags: fields.frames("tags").cloned(),
            }),
        }
    }

    /// Disassemble into the codec's field order, with encode defaults
    ///
    /// Frames with an encoding byte are written as UTF-16 (0x01), matching
    /// what every mainstream tagger emits.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        match self {
            FrameValue::Text(text) => {
                fields.insert("encodingByte", FieldValue::Number(1));
                fields.insert("text", FieldValue::Text(text.clone()));
            }
            FrameValue::Url(url) => {
                fields.insert("url", FieldValue::Text(url.clone()));
            }
            FrameValue::UserDefinedText(value) => {
                fields.insert("encodingByte", FieldValue::Number(1));
                fields.insert("description", FieldValue::Text(value.description.clone()));
                fields.insert("value", FieldValue::Text(value.value.clone()));
            }
            FrameValue::UserDefinedUrl(value) => {
                fields.insert("encodingByte", FieldValue::Number(1));
                fields.insert("description", FieldValue::Text(value.description.clone()));
                fields.insert("url", FieldValue::Text(value.url.clone()));
            }
            FrameValue::Picture(picture) => {
                fields.insert("encodingByte", FieldValue::Number(1));
                fields.insert("mime", FieldValue::Text(mime_full(&picture.mime)));
                fields.insert(
                    "typeId",
                    FieldValue::Number(
                        picture.picture_type.as_ref().map(|t| t.id).unwrap_or(0) as u64
                    ),
                );
                if let Some(description) = &picture.description {
                    fields.insert("description", FieldValue::Text(description.clone()));
                }
                fields.insert("imageBuffer", FieldValue::Binary(picture.image.clone()));
            }
            FrameValue::Lyrics(lyrics) => {
                fields.insert("encodingByte", FieldValue::Number(1));
                fields.insert("language", FieldValue::Text(lyrics.language.clone()));
                fields.insert("description", FieldValue::Text(lyrics.description.clone()));
                fields.insert("text", FieldValue::Text(lyrics.text.clone()));
            }
            FrameValue::Comment(comment) => {
                fields.insert("encodingByte", FieldValue::Number(1));
                fields.insert("language", FieldValue::Text(comment.language.clone()));
                fields.insert("description", FieldValue::Text(comment.description.clone()));
                fields.insert("text", FieldValue::Text(comment.text.clone()));
            }
            FrameValue::Popularimeter(popularimeter) => {
                fields.insert("email", FieldValue::Text(popularimeter.email.clone()));
                fields.insert("rating", FieldValue::Number(popularimeter.rating as u64));
                fields.insert("counter", FieldValue::Number(popularimeter.counter as u64));
            }
            FrameValue::Private(private) => {
                fields.insert(
                    "ownerIdentifier",
                    FieldValue::Text(private.owner_identifier.clone()),
                );
                fields.insert("data", FieldValue::Binary(private.data.clone()));
            }
            FrameValue::Chapter(chapter) => {
                fields.insert("elementID", FieldValue::Text(chapter.element_id.clone()));
                fields.insert(
                    "startTimeMs",
                    FieldValue::Number(chapter.start_time_ms as u64),
                );
                fields.insert("endTimeMs", FieldValue::Number(chapter.end_time_ms as u64));
                if let Some(offset) = chapter.start_offset_bytes {
                    fields.insert("startOffsetBytes", FieldValue::Number(offset as u64));
                }
                if let Some(offset) = chapter.end_offset_bytes {
                    fields.insert("endOffsetBytes", FieldValue::Number(offset as u64));
                }
                if let Some(tags) = &chapter.tags {
                    fields.insert("tags", FieldValue::Frames(tags.clone()));
                }
            }
        }
        fields
    }

    /// Parse a JSON value into the typed value for a known frame kind
    pub fn from_json(kind: FrameKind, value: &serde_json::Value) -> Result<FrameValue, TagError> {
        let invalid = |kind: FrameKind| {
            TagError::InvalidValue(format!("value does not fit frame kind {:?}", kind))
        };
        match kind {
            FrameKind::Text => value
                .as_str()
                .map(|s| FrameValue::Text(s.to_string()))
                .ok_or_else(|| invalid(kind)),
            FrameKind::Url => value
                .as_str()
                .map(|s| FrameValue::Url(s.to_string()))
                .ok_or_else(|| invalid(kind)),
            FrameKind::UserDefinedText => serde_json::from_value(value.clone())
                .map(FrameValue::UserDefinedText)
                .map_err(|_| invalid(kind)),
            FrameKind::UserDefinedUrl => serde_json::from_value(value.clone())
                .map(FrameValue::UserDefinedUrl)
                .map_err(|_| invalid(kind)),
            FrameKind::Picture => serde_json::from_value(value.clone())
                .map(FrameValue::Picture)
                .map_err(|_| invalid(kind)),
            FrameKind::Lyrics => serde_json::from_value(value.clone())
                .map(FrameValue::Lyrics)
                .map_err(|_| invalid(kind)),
            FrameKind::Comment => serde_json::from_value(value.clone())
                .map(FrameValue::Comment)
                .map_err(|_| invalid(kind)),
            FrameKind::Popularimeter => serde_json::from_value(value.clone())
                .map(FrameValue::Popularimeter)
                .map_err(|_| invalid(kind)),
            FrameKind::Private => serde_json::from_value(value.clone())
                .map(FrameValue::Private)
                .map_err(|_| invalid(kind)),
            FrameKind::Chapter => Chapter::from_json(value).map(FrameValue::Chapter),
        }
    }

    /// The field compared during update-merge, where the kind declares one
    pub fn compare_key(&self) -> Option<&str> {
        match self {
            FrameValue::UserDefinedText(value) => Some(&value.description),
            FrameValue::UserDefinedUrl(value) => Some(&value.description),
            _ => None,
        }
    }
}

impl Chapter {
    /// Chapters carry a nested tag map, which needs kind-directed parsing
    fn from_json(value: &serde_json::Value) -> Result<Chapter, TagError> {
        let object = value
            .as_object()
            .ok_or_else(|| TagError::InvalidValue("chapter value must be an object".into()))?;
        let number = |key: &str| object.get(key).and_then(|v| v.as_u64()).map(|n| n as u32);
        let tags = match object.get("tags") {
            Some(nested) => Some(Tag::from_json(nested)?),
            None => None,
        };
        Ok(Chapter {
            element_id: object
                .get("elementID")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            start_time_ms: number("startTimeMs").unwrap_or_default(),
            end_time_ms: number("endTimeMs").unwrap_or_default(),
            start_offset_bytes: number("startOffsetBytes"),
            end_offset_bytes: number("endOffsetBytes"),
            tags,
        })
    }
}
