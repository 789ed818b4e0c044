//! Address text classification and parsing
//!
//! Text containing `:` is an IPv6 address, text containing `.` (and no `:`)
//! is IPv4. Anything else is rejected before parsing.

use crate::error::IpdbError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Parse an address string into an [`IpAddr`]
///
/// The family is chosen from the separators present in the text, so
/// `::ffff:1.2.3.4` is looked up as IPv6.
pub fn parse_address(text: &str) -> Result<IpAddr, IpdbError> {
    if text.contains(':') {
        text.parse::<Ipv6Addr>()
            .map(IpAddr::V6)
            .map_err(|_| IpdbError::IpFormat(format!("ipv6 format error: {}", text)))
    } else if text.contains('.') {
        text.parse::<Ipv4Addr>()
            .map(IpAddr::V4)
            .map_err(|_| IpdbError::IpFormat(format!("ipv4 format error: {}", text)))
    } else {
        Err(IpdbError::IpFormat(format!("ip format error: {}", text)))
    }
}

/// Big-endian key bytes of an address, without heap allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressKey {
    bytes: [u8; 16],
    len: usize,
}

impl AddressKey {
    /// 4 bytes for IPv4, 16 for IPv6
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Key bytes for a tree walk: 4 for IPv4, 16 for IPv6
pub fn address_bytes(addr: IpAddr) -> AddressKey {
    match addr {
        IpAddr::V4(v4) => {
            let mut bytes = [0u8; 16];
            bytes[..4].copy_from_slice(&v4.octets());
            AddressKey { bytes, len: 4 }
        }
        IpAddr::V6(v6) => AddressKey {
            bytes: v6.octets(),
            len: 16,
        },
    }
}
