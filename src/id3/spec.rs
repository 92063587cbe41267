// Static field specifications for each supported frame kind
//
// Each frame body is described as an ordered list of fields. The generic
// codec in id3::codec interprets these tables in both directions; nothing
// here is executable.

/// How a field occupies bytes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// A fixed number of bytes, or the whole remaining body when None
    Fixed(Option<usize>),
    /// Bytes up to a NUL terminator sized by the active encoding
    NullTerminated,
    /// A nested frame sequence (chapter sub-tags)
    Subframes,
}

/// How consumed bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Big-endian unsigned integer
    Number,
    /// Text in the field's resolved encoding
    Text,
    /// Raw bytes
    Binary,
    /// A decoded nested tag
    Frames,
}

/// Where a text field's encoding comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    /// Latin-1, the default for fields without an encoding byte
    Latin1,
    /// The decoded value of a named sibling field (the encoding byte)
    Field(&'static str),
}

/// One field in a frame body
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub wire: WireType,
    pub data: DataType,
    pub encoding: EncodingSource,
    /// Skipped without ending the decode when the body is exhausted
    pub optional: bool,
    /// Consumed during decode but kept out of the exposed value
    pub internal: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, wire: WireType, data: DataType) -> Self {
        FieldSpec {
            name,
            wire,
            data,
            encoding: EncodingSource::Latin1,
            optional: false,
            internal: false,
        }
    }

    const fn encoded_by(mut self, field: &'static str) -> Self {
        self.encoding = EncodingSource::Field(field);
        self
    }

    const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    const fn internal(mut self) -> Self {
        self.internal = true;
        self
    }
}

/// The semantic category of a frame, selecting its field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Text,
    Url,
    UserDefinedText,
    UserDefinedUrl,
    Picture,
    Lyrics,
    Comment,
    Popularimeter,
    Private,
    Chapter,
}

const TEXT_INFORMATION: &[FieldSpec] = &[
    FieldSpec::new("encodingByte", WireType::Fixed(Some(1)), DataType::Number).internal(),
    FieldSpec::new("text", WireType::Fixed(None), DataType::Text).encoded_by("encodingByte"),
];

const URL: &[FieldSpec] = &[
    FieldSpec::new("url", WireType::Fixed(None), DataType::Text),
];

const USER_DEFINED_TEXT: &[FieldSpec] = &[
    FieldSpec::new("encodingByte", WireType::Fixed(Some(1)), DataType::Number).internal(),
    FieldSpec::new("description", WireType::NullTerminated, DataType::Text)
        .encoded_by("encodingByte"),
    FieldSpec::new("value", WireType::Fixed(None), DataType::Text).encoded_by("encodingByte"),
];

const USER_DEFINED_URL: &[FieldSpec] = &[
    FieldSpec::new("encodingByte", WireType::Fixed(Some(1)), DataType::Number).internal(),
    FieldSpec::new("description", WireType::NullTerminated, DataType::Text)
        .encoded_by("encodingByte"),
    // URLs are always Latin-1, independent of the encoding byte
    FieldSpec::new("url", WireType::Fixed(None), DataType::Text),
];

const ATTACHED_PICTURE: &[FieldSpec] = &[
    FieldSpec::new("encodingByte", WireType::Fixed(Some(1)), DataType::Number).internal(),
    FieldSpec::new("mime", WireType::NullTerminated, DataType::Text),
    FieldSpec::new("typeId", WireType::Fixed(Some(1)), DataType::Number),
    FieldSpec::new("description", WireType::NullTerminated, DataType::Text)
        .encoded_by("encodingByte"),
    FieldSpec::new("imageBuffer", WireType::Fixed(None), DataType::Binary),
];

const UNSYNCHRONISED_LYRICS: &[FieldSpec] = &[
    FieldSpec::new("encodingByte", WireType::Fixed(Some(1)), DataType::Number).internal(),
    FieldSpec::new("language", WireType::Fixed(Some(3)), DataType::Text),
    FieldSpec::new("description", WireType::NullTerminated, DataType::Text)
        .encoded_by("encodingByte"),
    FieldSpec::new("text", WireType::Fixed(None), DataType::Text).encoded_by("encodingByte"),
];

const COMMENT: &[FieldSpec] = &[
    FieldSpec::new("encodingByte", WireType::Fixed(Some(1)), DataType::Number).internal(),
    FieldSpec::new("language", WireType::Fixed(Some(3)), DataType::Text),
    FieldSpec::new("description", WireType::NullTerminated, DataType::Text)
        .encoded_by("encodingByte"),
    FieldSpec::new("text", WireType::Fixed(None), DataType::Text).encoded_by("encodingByte"),
];

const POPULARIMETER: &[FieldSpec] = &[
    FieldSpec::new("email", WireType::NullTerminated, DataType::Text),
    FieldSpec::new("rating", WireType::Fixed(Some(1)), DataType::Number),
    FieldSpec::new("counter", WireType::Fixed(Some(4)), DataType::Number),
];

const PRIVATE: &[FieldSpec] = &[
    FieldSpec::new("ownerIdentifier", WireType::NullTerminated, DataType::Text),
    FieldSpec::new("data", WireType::Fixed(None), DataType::Binary),
];

const CHAPTER: &[FieldSpec] = &[
    FieldSpec::new("elementID", WireType::NullTerminated, DataType::Text),
    FieldSpec::new("startTimeMs", WireType::Fixed(Some(4)), DataType::Number),
    FieldSpec::new("endTimeMs", WireType::Fixed(Some(4)), DataType::Number),
    FieldSpec::new("startOffsetBytes", WireType::Fixed(Some(4)), DataType::Number).optional(),
    FieldSpec::new("endOffsetBytes", WireType::Fixed(Some(4)), DataType::Number).optional(),
    FieldSpec::new("tags", WireType::Subframes, DataType::Frames).optional(),
];

impl FrameKind {
    /// The ordered field table for this kind
    pub fn spec(self) -> &'static [FieldSpec] {
        match self {
            FrameKind::Text => TEXT_INFORMATION,
            FrameKind::Url => URL,
            FrameKind::UserDefinedText => USER_DEFINED_TEXT,
            FrameKind::UserDefinedUrl => USER_DEFINED_URL,
            FrameKind::Picture => ATTACHED_PICTURE,
            FrameKind::Lyrics => UNSYNCHRONISED_LYRICS,
            FrameKind::Comment => COMMENT,
            FrameKind::Popularimeter => POPULARIMETER,
            FrameKind::Private => PRIVATE,
            FrameKind::Chapter => CHAPTER,
        }
    }

    /// Resolve a raw frame identifier to its kind for the given tag version
    ///
    /// Text and URL frames are recognized by their identifier prefix; the
    /// user-defined variants and the special kinds by exact identifier.
    pub fn from_identifier(identifier: &str, version: u8) -> Option<FrameKind> {
        match identifier {
            "TXXX" | "TXX" => return Some(FrameKind::UserDefinedText),
            "WXXX" | "WXX" => return Some(FrameKind::UserDefinedUrl),
            "COMM" | "COM" => return Some(FrameKind::Comment),
            "USLT" | "ULT" => return Some(FrameKind::Lyrics),
            "POPM" | "POP" => return Some(FrameKind::Popularimeter),
            "PRIV" => return Some(FrameKind::Private),
            "CHAP" => return Some(FrameKind::Chapter),
            "APIC" => return Some(FrameKind::Picture),
            "PIC" if version == 2 => return Some(FrameKind::Picture),
            _ => {}
        }
        match identifier.as_bytes().first() {
            Some(b'T') => Some(FrameKind::Text),
            Some(b'W') => Some(FrameKind::Url),
            _ => None,
        }
    }
}
