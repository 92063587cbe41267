// Text encoding utilities for ID3v2 frame bodies

use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Text encoding types selected by the frame encoding byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Latin1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    /// Unknown encoding bytes fall back to Latin-1
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => TextEncoding::Latin1,
            1 => TextEncoding::Utf16,
            2 => TextEncoding::Utf16BE,
            3 => TextEncoding::Utf8,
            _ => TextEncoding::Latin1,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Width of the NUL terminator: 2 bytes for the UTF-16 variants, 1 otherwise
    pub fn terminator_width(self) -> usize {
        match self {
            TextEncoding::Utf16 | TextEncoding::Utf16BE => 2,
            _ => 1,
        }
    }
}

/// Decode text with the specified encoding, stripping embedded NUL bytes
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    let decoded = match encoding {
        TextEncoding::Latin1 => {
            WINDOWS_1252.decode(data).0.to_string()
        }
        TextEncoding::Utf16 => {
            // Detect BOM, default to little-endian without one
            if data.len() >= 2 {
                if data[0..2] == [0xFF, 0xFE] {
                    UTF_16LE.decode(&data[2..]).0.to_string()
                } else if data[0..2] == [0xFE, 0xFF] {
                    UTF_16BE.decode(&data[2..]).0.to_string()
                } else {
                    UTF_16LE.decode(data).0.to_string()
                }
            } else {
                String::new()
            }
        }
        TextEncoding::Utf16BE => {
            UTF_16BE.decode(data).0.to_string()
        }
        TextEncoding::Utf8 => {
            UTF_8.decode(data).0.to_string()
        }
    };

    // Malformed frames can carry stray NULs inside the text
    if decoded.contains('\0') {
        decoded.replace('\0', "")
    } else {
        decoded
    }
}

/// Encode text with the specified encoding
pub fn encode_text(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Latin1 => {
            WINDOWS_1252.encode(text).0.to_vec()
        }
        TextEncoding::Utf16 => {
            // encoding_rs only decodes UTF-16, so encode by hand: LE BOM + code units
            let mut out = vec![0xFF, 0xFE];
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out
        }
        TextEncoding::Utf16BE => {
            let mut out = Vec::with_capacity(text.len() * 2);
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
            out
        }
        TextEncoding::Utf8 => {
            UTF_8.encode(text).0.to_vec()
        }
    }
}

/// NUL terminator bytes for the given encoding
pub fn terminator(encoding: TextEncoding) -> &'static [u8] {
    match encoding.terminator_width() {
        2 => &[0x00, 0x00],
        _ => &[0x00],
    }
}
