//! ipdb Format Reader
//!
//! Decoding for the ipdb binary layout:
//!
//! ```text
//! [0:4)            metadata length M (u32, big-endian)
//! [4:4+M)          JSON metadata
//! [4+M : 4+M+8*N)  node table, N = node_count
//! [4+M+8*N : EOF)  record blob
//! ```
//!
//! ## Architecture
//!
//! - **types**: layout constants and the address-family bitmask
//! - **header**: metadata parsing and file size validation
//! - **tree**: search tree traversal for IP lookups
//! - **record**: record decoding and language selection

pub mod header;
pub mod record;
pub mod tree;
pub mod types;

pub use header::Header;
pub use record::{select_language, RecordResolver};
pub use tree::{SearchTree, TreeLeaf};
pub use types::{IpFamilies, NODE_BYTES};
