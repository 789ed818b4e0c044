//! Record decoding
//!
//! A leaf reference is rebased into the record blob by subtracting the
//! node count and adding the node table size. At that offset lies a
//! 2-byte big-endian length followed by that many bytes of UTF-8 text:
//! tab-separated columns, one block of `fields.len()` columns per language.

use super::types::{COLUMN_SEPARATOR, NODE_BYTES, RECORD_LEN_BYTES};
use crate::error::IpdbError;

/// Decodes records out of the data region (node table followed by blob)
#[derive(Debug, Clone, Copy)]
pub struct RecordResolver<'a> {
    data: &'a [u8],
    node_count: u32,
}

impl<'a> RecordResolver<'a> {
    /// Create a resolver over the data region
    pub fn new(data: &'a [u8], node_count: u32) -> Self {
        Self { data, node_count }
    }

    /// Byte offset of a leaf's record within the data region
    pub fn record_offset(&self, leaf: u32) -> Result<usize, IpdbError> {
        let node_count = self.node_count as u64;
        let offset = (leaf as u64)
            .checked_sub(node_count)
            .map(|rel| rel + node_count * NODE_BYTES as u64)
            .ok_or_else(|| {
                IpdbError::InvalidFormat(format!(
                    "leaf {} is not past node count {}",
                    leaf, self.node_count
                ))
            })?;

        usize::try_from(offset)
            .map_err(|_| IpdbError::InvalidFormat(format!("record offset {} overflows", offset)))
    }

    /// Decode the full record text behind a leaf reference
    pub fn resolve(&self, leaf: u32) -> Result<&'a str, IpdbError> {
        let offset = self.record_offset(leaf)?;

        let len_bytes = offset
            .checked_add(RECORD_LEN_BYTES)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| {
                IpdbError::InvalidFormat(format!(
                    "database resolve error: record offset {} exceeds data size {}",
                    offset,
                    self.data.len()
                ))
            })?;
        let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;

        let start = offset + RECORD_LEN_BYTES;
        let bytes = self.data.get(start..start + len).ok_or_else(|| {
            IpdbError::InvalidFormat(format!(
                "database resolve error: record of {} bytes at {} exceeds data size {}",
                len,
                start,
                self.data.len()
            ))
        })?;

        std::str::from_utf8(bytes).map_err(|e| {
            IpdbError::InvalidFormat(format!(
                "database resolve error: record at {} is not UTF-8: {}",
                offset, e
            ))
        })
    }
}

/// Slice one language's columns out of a record
///
/// The record is split into at most `field_count * language_count`
/// columns; anything beyond that stays inside the last column.
pub fn select_language(
    text: &str,
    language_offset: usize,
    field_count: usize,
    language_count: usize,
) -> Result<Vec<&str>, IpdbError> {
    if field_count == 0 {
        return Ok(Vec::new());
    }

    let limit = field_count.saturating_mul(language_count).max(1);
    let columns: Vec<&str> = text.splitn(limit, COLUMN_SEPARATOR).collect();

    let end = language_offset.saturating_add(field_count);
    if end > columns.len() {
        return Err(IpdbError::InvalidFormat(format!(
            "record has {} columns, language block needs {}..{}",
            columns.len(),
            language_offset,
            end
        )));
    }

    Ok(columns[language_offset..end].to_vec())
}
