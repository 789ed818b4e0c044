//! ipdb Header Parsing
//!
//! The file starts with a 4-byte big-endian length `M` followed by `M` bytes
//! of UTF-8 JSON metadata, e.g.
//!
//! ```text
//! {"build":1547017060,"ip_version":1,"languages":{"CN":0},"node_count":411432,
//!  "total_size":3330322,"fields":["country_name","region_name","city_name"]}
//! ```
//!
//! The metadata is the only structured input in the file besides raw
//! offsets, so every key is extracted explicitly with presence and type
//! checks instead of deserializing straight into a struct.

use super::types::{IpFamilies, METADATA_LEN_BYTES, NODE_BYTES};
use crate::error::IpdbError;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Decoded ipdb metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    /// Build time (seconds since the Unix epoch)
    pub build: u64,
    /// Supported address families
    pub ip_version: IpFamilies,
    /// Language code -> first column of that language's block
    pub languages: FxHashMap<String, usize>,
    /// Field names, in column order within a language block
    pub fields: Vec<String>,
    /// Number of entries in the node table
    pub node_count: u32,
    /// Size of node table plus record blob in bytes
    pub total_size: u64,
}

impl Header {
    /// Parse the metadata block at the start of `data`
    ///
    /// Returns the header and the offset of the node table (`4 + M`).
    /// The declared `total_size` must account for every byte after the
    /// metadata block.
    pub fn from_file(data: &[u8]) -> Result<(Self, usize), IpdbError> {
        if data.len() < METADATA_LEN_BYTES {
            return Err(IpdbError::InvalidFormat(format!(
                "file is {} bytes, too short for the metadata length",
                data.len()
            )));
        }

        let meta_len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        let data_offset = METADATA_LEN_BYTES
            .checked_add(meta_len)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                IpdbError::InvalidFormat(format!(
                    "metadata length {} exceeds file size {}",
                    meta_len,
                    data.len()
                ))
            })?;

        let header = Self::from_json(&data[METADATA_LEN_BYTES..data_offset])?;

        let declared = (data_offset as u64).checked_add(header.total_size);
        if declared != Some(data.len() as u64) {
            return Err(IpdbError::InvalidFormat(format!(
                "database file size error: 4 + {} + {} != {}",
                meta_len,
                header.total_size,
                data.len()
            )));
        }

        if header.tree_size() as u64 > header.total_size {
            return Err(IpdbError::InvalidFormat(format!(
                "node table of {} nodes does not fit in {} data bytes",
                header.node_count, header.total_size
            )));
        }

        Ok((header, data_offset))
    }

    /// Decode the metadata JSON object
    pub fn from_json(bytes: &[u8]) -> Result<Self, IpdbError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| IpdbError::InvalidFormat(format!("metadata is not UTF-8: {}", e)))?;

        let value: Value = serde_json::from_str(text)
            .map_err(|e| IpdbError::InvalidFormat(format!("failed to decode metadata: {}", e)))?;

        let map = match value {
            Value::Object(map) => map,
            _ => {
                return Err(IpdbError::InvalidFormat(
                    "metadata is not an object".to_string(),
                ))
            }
        };

        let build = extract_uint(&map, "build")?;
        let ip_version = extract_uint(&map, "ip_version")?;
        let node_count = extract_uint(&map, "node_count")?;
        let total_size = extract_uint(&map, "total_size")?;

        let ip_version = u16::try_from(ip_version).map_err(|_| {
            IpdbError::InvalidFormat(format!("ip_version {} out of range", ip_version))
        })?;
        let node_count = u32::try_from(node_count).map_err(|_| {
            IpdbError::InvalidFormat(format!("node_count {} out of range", node_count))
        })?;

        Ok(Header {
            build,
            ip_version: IpFamilies::from_bits(ip_version),
            languages: extract_languages(&map)?,
            fields: extract_fields(&map)?,
            node_count,
            total_size,
        })
    }

    /// Size of the node table in bytes
    pub fn tree_size(&self) -> usize {
        self.node_count as usize * NODE_BYTES
    }

    /// Column offset of a language block, if the language exists
    pub fn language_offset(&self, language: &str) -> Option<usize> {
        self.languages.get(language).copied()
    }

    /// Number of tab-separated columns in a full record
    pub fn column_count(&self) -> usize {
        self.fields.len() * self.languages.len()
    }

    /// Language codes ordered by their column offset
    pub fn languages_by_offset(&self) -> Vec<&str> {
        let mut languages: Vec<(&str, usize)> = self
            .languages
            .iter()
            .map(|(code, &offset)| (code.as_str(), offset))
            .collect();
        languages.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        languages.into_iter().map(|(code, _)| code).collect()
    }
}

fn extract_uint(map: &Map<String, Value>, key: &str) -> Result<u64, IpdbError> {
    match map.get(key) {
        Some(value) => value.as_u64().ok_or_else(|| {
            IpdbError::InvalidFormat(format!(
                "metadata field '{}' is not a non-negative integer: {}",
                key, value
            ))
        }),
        None => Err(IpdbError::InvalidFormat(format!(
            "metadata field '{}' is missing",
            key
        ))),
    }
}

fn extract_languages(map: &Map<String, Value>) -> Result<FxHashMap<String, usize>, IpdbError> {
    let entries = match map.get("languages") {
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            return Err(IpdbError::InvalidFormat(format!(
                "metadata field 'languages' is not an object: {}",
                other
            )))
        }
        None => {
            return Err(IpdbError::InvalidFormat(
                "metadata field 'languages' is missing".to_string(),
            ))
        }
    };

    let mut languages = FxHashMap::default();
    for (code, offset) in entries {
        let offset = offset
            .as_u64()
            .and_then(|o| usize::try_from(o).ok())
            .ok_or_else(|| {
                IpdbError::InvalidFormat(format!(
                    "language '{}' has an invalid offset: {}",
                    code, offset
                ))
            })?;
        languages.insert(code.clone(), offset);
    }
    Ok(languages)
}

fn extract_fields(map: &Map<String, Value>) -> Result<Vec<String>, IpdbError> {
    let items = match map.get("fields") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(IpdbError::InvalidFormat(format!(
                "metadata field 'fields' is not an array: {}",
                other
            )))
        }
        None => {
            return Err(IpdbError::InvalidFormat(
                "metadata field 'fields' is missing".to_string(),
            ))
        }
    };

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                IpdbError::InvalidFormat(format!("field name is not a string: {}", item))
            })
        })
        .collect()
}
