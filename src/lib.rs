//! ipdb - Read-only Query Engine for ipdb IP Geolocation Databases
//!
//! An ipdb file is a binary trie over IP address bits whose leaves point to
//! tab-separated, multi-language location/ISP records. This crate loads a
//! file once and answers lookups of the form "address + language → field
//! values".
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ipdb::Database;
//!
//! let db = Database::open("ipv4_city.ipdb")?;
//!
//! println!("fields: {:?}", db.fields());
//! println!("languages: {:?}", db.languages());
//!
//! match db.lookup("123.123.123.123", "CN")? {
//!     Some(values) => println!("Found: {:?}", values),
//!     None => println!("Not found"),
//! }
//!
//! // Named access to well-known fields
//! if let Some(info) = db.lookup_info("123.123.123.123", "CN")? {
//!     println!("{} / {} / {}", info.country_name(), info.region_name(), info.city_name());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # File Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  u32 metadata length (big-endian)    │
//! │  JSON metadata                       │
//! │  Node table (node_count × 8 bytes)   │
//! │  Record blob ([u16 len][UTF-8] ...)  │
//! └──────────────────────────────────────┘
//! ```
//!
//! Plain files are memory-mapped and `.gz` files are decompressed on open.
//! A loaded [`Database`] is immutable and can be shared across threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Address text classification and parsing
pub mod address;
/// Database API
pub mod database;
/// Error types for ipdb operations
pub mod error;
pub mod file_reader;
/// ipdb binary format decoding
pub mod format;
/// Named-field lookup results
pub mod info;

// Re-exports for Rust consumers

/// Database handle and enumeration results
pub use crate::database::{Database, NetworkRecord};

pub use crate::error::{IpdbError, Result};
pub use crate::format::Header;
pub use crate::info::LocationInfo;

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
