//! Ferrotag - an ID3v2 metadata library
//!
//! Reads, writes, updates and removes ID3v2.2/2.3/2.4 tags in audio file
//! buffers. All parsing is tolerant: malformed bytes degrade to partial or
//! empty results instead of errors, and writing always emits ID3v2.3.0.

use std::path::Path;

pub mod field_mapping;
pub mod id3;
mod utils;

pub use crate::id3::{FrameValue, Tag, TagEntry, TagError, TagMap};
pub use crate::utils::encoding::TextEncoding;

use crate::id3::{header, tag};

/// Decode the first valid tag in a buffer, None when there is none
pub fn read_tags_from_buffer(buffer: &[u8]) -> Option<Tag> {
    Tag::from_buffer(buffer)
}

/// Read and decode the tag of an audio file
pub fn read_tags(path: impl AsRef<Path>) -> Result<Option<Tag>, TagError> {
    let buffer = utils::io::read_file(path.as_ref())?;
    Ok(Tag::from_buffer(&buffer))
}

/// Encode a tag map into a standalone ID3v2.3.0 tag buffer
pub fn create_tag_buffer(tags: &TagMap) -> Result<Vec<u8>, TagError> {
    tag::create_tag(tags)
}

/// Prepend a freshly encoded tag to a file image, replacing any existing tag
pub fn write_tags_to_buffer(tags: &TagMap, buffer: &[u8]) -> Result<Vec<u8>, TagError> {
    let tag_buffer = tag::create_tag(tags)?;
    let stripped = remove_tags_from_buffer(buffer);
    let mut out = Vec::with_capacity(tag_buffer.len() + stripped.len());
    out.extend(tag_buffer);
    out.extend(stripped);
    Ok(out)
}

/// Rewrite a file with the given tags, replacing any existing tag
pub fn write_tags(tags: &TagMap, path: impl AsRef<Path>) -> Result<(), TagError> {
    let path = path.as_ref();
    let buffer = utils::io::read_file(path)?;
    let rewritten = write_tags_to_buffer(tags, &buffer)?;
    utils::io::write_file(path, &rewritten)?;
    Ok(())
}

/// Merge new tags into a buffer's existing tag and re-encode
///
/// Friendly keys are resolved to raw identifiers first; repeatable kinds
/// merge element-wise by their comparison key, everything else overwrites.
pub fn update_tags_in_buffer(tags: &TagMap, buffer: &[u8]) -> Result<Vec<u8>, TagError> {
    let mut existing = Tag::from_buffer(buffer).map(|t| t.raw).unwrap_or_default();
    tag::merge_raw(&mut existing, tag::normalize_to_raw(tags));
    write_tags_to_buffer(&existing, buffer)
}

/// Merge new tags into a file's existing tag and rewrite it
pub fn update_tags(tags: &TagMap, path: impl AsRef<Path>) -> Result<(), TagError> {
    let path = path.as_ref();
    let buffer = utils::io::read_file(path)?;
    let rewritten = update_tags_in_buffer(tags, &buffer)?;
    utils::io::write_file(path, &rewritten)?;
    Ok(())
}

/// Merge a raw tag map into another, returning the combined map
pub fn merge_tags(mut existing: TagMap, incoming: TagMap) -> TagMap {
    tag::merge_raw(&mut existing, incoming);
    existing
}

/// Byte offset of the first valid tag header in the buffer
pub fn locate_tag(buffer: &[u8]) -> Option<usize> {
    header::locate_tag(buffer)
}

/// Total byte length of the tag at `offset`, header included
///
/// None when the size bytes violate the synchsafe layout; callers must not
/// guess a length in that case.
pub fn tag_byte_length(buffer: &[u8], offset: usize) -> Option<usize> {
    header::tag_byte_length(buffer, offset)
}

/// Splice an existing tag out of a file image
///
/// The buffer comes back unchanged when no tag is found, and also when the
/// header's size bytes are invalid: splicing with a guessed length would
/// corrupt the audio data after it.
pub fn remove_tags_from_buffer(buffer: &[u8]) -> Vec<u8> {
    let Some(offset) = header::locate_tag(buffer) else {
        return buffer.to_vec();
    };
    let Some(length) = header::tag_byte_length(buffer, offset) else {
        return buffer.to_vec();
    };
    let mut out = Vec::with_capacity(buffer.len().saturating_sub(length));
    out.extend_from_slice(&buffer[..offset]);
    if offset + length < buffer.len() {
        out.extend_from_slice(&buffer[offset + length..]);
    }
    out
}

/// Remove the tag from a file; returns whether anything was removed
pub fn remove_tags(path: impl AsRef<Path>) -> Result<bool, TagError> {
    let path = path.as_ref();
    let buffer = utils::io::read_file(path)?;
    let stripped = remove_tags_from_buffer(&buffer);
    if stripped.len() == buffer.len() {
        return Ok(false);
    }
    utils::io::write_file(path, &stripped)?;
    Ok(true)
}
