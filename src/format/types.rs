//! ipdb-specific Type Definitions
//!
//! Layout constants shared by the header parser, the search tree and the
//! record resolver, plus the address-family bitmask.

use serde::Serialize;

/// Size of the big-endian length prefix in front of the metadata block
pub const METADATA_LEN_BYTES: usize = 4;

/// Size of one branch target inside a node entry
pub const BRANCH_BYTES: usize = 4;

/// Size of one node table entry (two branch targets)
///
/// Used both to size the node table and to rebase leaf references into
/// the record blob that follows it.
pub const NODE_BYTES: usize = 2 * BRANCH_BYTES;

/// Size of the big-endian length prefix in front of each record
pub const RECORD_LEN_BYTES: usize = 2;

/// Column separator inside record text
pub const COLUMN_SEPARATOR: char = '\t';

/// Number of leading bits of the `::ffff:0:0/96` prefix that are zero
pub const V4_MAPPED_ZERO_BITS: usize = 80;

/// Total length of the IPv4-mapped IPv6 prefix
pub const V4_MAPPED_PREFIX_BITS: usize = 96;

/// Address families supported by a database (`ip_version` bitmask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IpFamilies(u16);

impl IpFamilies {
    /// Bit set when the database holds IPv4 data
    pub const IPV4: u16 = 0x01;
    /// Bit set when the database holds IPv6 data
    pub const IPV6: u16 = 0x02;

    /// Wrap a raw `ip_version` bitmask
    pub fn from_bits(bits: u16) -> Self {
        IpFamilies(bits)
    }

    /// Raw bitmask as stored in the header
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Whether IPv4 lookups are supported
    pub fn supports_ipv4(self) -> bool {
        self.0 & Self::IPV4 == Self::IPV4
    }

    /// Whether IPv6 lookups are supported
    pub fn supports_ipv6(self) -> bool {
        self.0 & Self::IPV6 == Self::IPV6
    }
}
