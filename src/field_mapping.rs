// Alias mapping between friendly tag names and raw frame identifiers
//
// ID3v2.3/2.4 use four-character frame identifiers, ID3v2.2 three-character
// ones. These tables are static configuration: the friendly name exposed to
// callers, the raw identifier per version, and for repeatable kinds the
// multiplicity plus the field compared during updates.

use crate::id3::spec::FrameKind;

/// Text information frames, friendly name to ID3v2.3 identifier
pub const TEXT_FRAMES: [(&str, &str); 38] = [
    ("album", "TALB"),
    ("bpm", "TBPM"),
    ("composer", "TCOM"),
    ("genre", "TCON"),
    ("copyright", "TCOP"),
    ("date", "TDAT"),
    ("playlistDelay", "TDLY"),
    ("encodedBy", "TENC"),
    ("textWriter", "TEXT"),
    ("fileType", "TFLT"),
    ("time", "TIME"),
    ("contentGroup", "TIT1"),
    ("title", "TIT2"),
    ("subtitle", "TIT3"),
    ("initialKey", "TKEY"),
    ("language", "TLAN"),
    ("length", "TLEN"),
    ("mediaType", "TMED"),
    ("originalTitle", "TOAL"),
    ("originalFilename", "TOFN"),
    ("originalTextwriter", "TOLY"),
    ("originalArtist", "TOPE"),
    ("originalYear", "TORY"),
    ("fileOwner", "TOWN"),
    ("artist", "TPE1"),
    ("performerInfo", "TPE2"),
    ("conductor", "TPE3"),
    ("remixArtist", "TPE4"),
    ("partOfSet", "TPOS"),
    ("publisher", "TPUB"),
    ("trackNumber", "TRCK"),
    ("recordingDates", "TRDA"),
    ("internetRadioName", "TRSN"),
    ("internetRadioOwner", "TRSO"),
    ("size", "TSIZ"),
    ("ISRC", "TSRC"),
    ("encodingTechnology", "TSSE"),
    ("year", "TYER"),
];

/// Text information frames, friendly name to ID3v2.2 identifier
pub const TEXT_FRAMES_V2: [(&str, &str); 34] = [
    ("album", "TAL"),
    ("bpm", "TBP"),
    ("composer", "TCM"),
    ("genre", "TCO"),
    ("copyright", "TCR"),
    ("date", "TDA"),
    ("playlistDelay", "TDY"),
    ("encodedBy", "TEN"),
    ("textWriter", "TEXT"),
    ("fileType", "TFT"),
    ("time", "TIM"),
    ("contentGroup", "TT1"),
    ("title", "TT2"),
    ("subtitle", "TT3"),
    ("initialKey", "TKE"),
    ("language", "TLA"),
    ("length", "TLE"),
    ("mediaType", "TMT"),
    ("originalTitle", "TOT"),
    ("originalFilename", "TOF"),
    ("originalTextwriter", "TOL"),
    ("originalArtist", "TOA"),
    ("originalYear", "TOR"),
    ("artist", "TP1"),
    ("performerInfo", "TP2"),
    ("conductor", "TP3"),
    ("remixArtist", "TP4"),
    ("partOfSet", "TPA"),
    ("publisher", "TPB"),
    ("trackNumber", "TRK"),
    ("recordingDates", "TRD"),
    ("size", "TSI"),
    ("ISRC", "TRC"),
    ("encodingTechnology", "TSS"),
];

/// A URL link frame kind
#[derive(Debug, PartialEq)]
pub struct UrlFrame {
    pub alias: &'static str,
    pub identifier: &'static str,
    pub multiple: bool,
}

const fn url_frame(alias: &'static str, identifier: &'static str, multiple: bool) -> UrlFrame {
    UrlFrame {
        alias,
        identifier,
        multiple,
    }
}

pub const URL_FRAMES: [UrlFrame; 8] = [
    url_frame("commercialUrl", "WCOM", true),
    url_frame("copyrightUrl", "WCOP", false),
    url_frame("fileUrl", "WOAF", false),
    url_frame("artistUrl", "WOAR", true),
    url_frame("audioSourceUrl", "WOAS", false),
    url_frame("radioStationUrl", "WORS", false),
    url_frame("paymentUrl", "WPAY", false),
    url_frame("publisherUrl", "WPUB", false),
];

pub const URL_FRAMES_V2: [UrlFrame; 6] = [
    url_frame("commercialUrl", "WCM", true),
    url_frame("copyrightUrl", "WCP", false),
    url_frame("fileUrl", "WAF", false),
    url_frame("artistUrl", "WAR", true),
    url_frame("audioSourceUrl", "WAS", false),
    url_frame("publisherUrl", "WPB", false),
];

/// A frame kind with its own body specification
pub struct SpecialFrame {
    pub alias: &'static str,
    pub identifier: &'static str,
    pub kind: FrameKind,
    pub multiple: bool,
    /// Field matched during update-merge; kinds without one append
    pub compare_key: Option<&'static str>,
}

const fn special_frame(
    alias: &'static str,
    identifier: &'static str,
    kind: FrameKind,
    multiple: bool,
    compare_key: Option<&'static str>,
) -> SpecialFrame {
    SpecialFrame {
        alias,
        identifier,
        kind,
        multiple,
        compare_key,
    }
}

pub const SPECIAL_FRAMES: [SpecialFrame; 8] = [
    special_frame("comment", "COMM", FrameKind::Comment, true, None),
    special_frame("image", "APIC", FrameKind::Picture, false, None),
    special_frame(
        "unsynchronisedLyrics",
        "USLT",
        FrameKind::Lyrics,
        false,
        None,
    ),
    special_frame(
        "userDefinedText",
        "TXXX",
        FrameKind::UserDefinedText,
        true,
        Some("description"),
    ),
    special_frame("popularimeter", "POPM", FrameKind::Popularimeter, true, None),
    special_frame("private", "PRIV", FrameKind::Private, true, None),
    special_frame("chapter", "CHAP", FrameKind::Chapter, true, None),
    special_frame(
        "userDefinedUrl",
        "WXXX",
        FrameKind::UserDefinedUrl,
        true,
        Some("description"),
    ),
];

pub const SPECIAL_FRAMES_V2: [SpecialFrame; 6] = [
    special_frame("comment", "COM", FrameKind::Comment, true, None),
    special_frame("image", "PIC", FrameKind::Picture, false, None),
    special_frame("unsynchronisedLyrics", "ULT", FrameKind::Lyrics, false, None),
    special_frame(
        "userDefinedText",
        "TXX",
        FrameKind::UserDefinedText,
        true,
        Some("description"),
    ),
    special_frame("popularimeter", "POP", FrameKind::Popularimeter, true, None),
    special_frame(
        "userDefinedUrl",
        "WXX",
        FrameKind::UserDefinedUrl,
        true,
        Some("description"),
    ),
];

fn text_frames(version: u8) -> &'static [(&'static str, &'static str)] {
    if version == 2 {
        &TEXT_FRAMES_V2
    } else {
        &TEXT_FRAMES
    }
}

fn url_frames(version: u8) -> &'static [UrlFrame] {
    if version == 2 {
        &URL_FRAMES_V2
    } else {
        &URL_FRAMES
    }
}

fn special_frames(version: u8) -> &'static [SpecialFrame] {
    if version == 2 {
        &SPECIAL_FRAMES_V2
    } else {
        &SPECIAL_FRAMES
    }
}

/// Friendly name of a text frame identifier, per version
pub fn text_alias(identifier: &str, version: u8) -> Option<&'static str> {
    text_frames(version)
        .iter()
        .find(|(_, id)| *id == identifier)
        .map(|(alias, _)| *alias)
}

/// Look up a URL frame kind by its raw identifier, per version
pub fn url_frame_by_identifier(identifier: &str, version: u8) -> Option<&'static UrlFrame> {
    url_frames(version).iter().find(|f| f.identifier == identifier)
}

/// Look up a special frame kind by its raw identifier, per version
pub fn special_by_identifier(identifier: &str, version: u8) -> Option<&'static SpecialFrame> {
    special_frames(version).iter().find(|f| f.identifier == identifier)
}

/// Whether a raw identifier may repeat within one tag
pub fn is_multiple(identifier: &str, version: u8) -> bool {
    if let Some(frame) = url_frame_by_identifier(identifier, version) {
        return frame.multiple;
    }
    if let Some(frame) = special_by_identifier(identifier, version) {
        return frame.multiple;
    }
    false
}

/// Comparison key used when merging updates into an existing raw map
pub fn compare_key(identifier: &str) -> Option<&'static str> {
    special_by_identifier(identifier, 3).and_then(|f| f.compare_key)
}

/// A tag key resolved against the ID3v2.3 write tables
pub enum ResolvedKey {
    Text(&'static str),
    Url(&'static UrlFrame),
    Special(&'static SpecialFrame),
}

/// Resolve an input key, friendly alias or raw identifier, for encoding
///
/// Writing always targets v2.3, so only the v2.3 tables participate.
pub fn resolve_key(key: &str) -> Option<ResolvedKey> {
    if let Some((_, identifier)) = TEXT_FRAMES.iter().find(|(alias, _)| *alias == key) {
        return Some(ResolvedKey::Text(identifier));
    }
    if let Some((_, identifier)) = TEXT_FRAMES.iter().find(|(_, id)| *id == key) {
        return Some(ResolvedKey::Text(identifier));
    }
    if let Some(frame) = URL_FRAMES
        .iter()
        .find(|f| f.alias == key || f.identifier == key)
    {
        return Some(ResolvedKey::Url(frame));
    }
    if let Some(frame) = SPECIAL_FRAMES
        .iter()
        .find(|f| f.alias == key || f.identifier == key)
    {
        return Some(ResolvedKey::Special(frame));
    }
    None
}
