// ID3v2 tag handling module
pub mod codec;
pub mod frames;
pub mod header;
pub mod spec;
pub mod tag;
pub mod value;

pub use tag::{Tag, TagEntry, TagMap};
pub use value::FrameValue;

/// Errors raised by tag operations
///
/// Malformed input bytes never produce one of these: bad bytes degrade to
/// partial or empty results. Errors mean I/O failure or a caller handing a
/// value that cannot form a well-defined frame.
#[derive(Debug)]
pub enum TagError {
    Io(std::io::Error),
    InvalidValue(String),
}

impl std::fmt::Display for TagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagError::Io(e) => write!(f, "I/O error: {}", e),
            TagError::InvalidValue(msg) => write!(f, "Invalid tag value: {}", msg),
        }
    }
}

impl std::error::Error for TagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagError::Io(e) => Some(e),
            TagError::InvalidValue(_) => None,
        }
    }
}

impl From<std::io::Error> for TagError {
    fn from(e: std::io::Error) -> Self {
        TagError::Io(e)
    }
}
