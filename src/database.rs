//! Database API
//!
//! Loads an ipdb file once and answers lookups against it. A lookup takes
//! an address string and a language code and returns that language's
//! column values in header field order.
//!
//! Loading either yields a fully validated database or an error; after
//! that the data is never mutated, so a `Database` can be shared across
//! threads without locking.

use crate::address::{address_bytes, parse_address};
use crate::error::IpdbError;
use crate::file_reader;
use crate::format::{select_language, Header, RecordResolver, SearchTree};
use crate::info::LocationInfo;
use memmap2::Mmap;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

/// Storage for database data - either owned or memory-mapped
enum DatabaseStorage {
    Owned(Vec<u8>),
    Mmap(Mmap),
}

impl DatabaseStorage {
    fn as_slice(&self) -> &[u8] {
        match self {
            DatabaseStorage::Owned(v) => v.as_slice(),
            DatabaseStorage::Mmap(m) => &m[..],
        }
    }
}

/// One network found while enumerating the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkRecord {
    /// First address of the network
    pub network: IpAddr,
    /// Network prefix length (CIDR)
    pub prefix_len: u8,
    /// Column values for the requested language
    pub values: Vec<String>,
}

impl NetworkRecord {
    /// CIDR notation, e.g. `1.2.3.0/24`
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.network, self.prefix_len)
    }
}

/// Read-only ipdb database
///
/// # Examples
///
/// ```no_run
/// use ipdb::Database;
///
/// let db = Database::open("ipv4_city.ipdb")?;
///
/// if let Some(fields) = db.lookup("123.123.123.123", "CN")? {
///     println!("{:?}", fields);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Database {
    data: DatabaseStorage,
    header: Header,
    /// Offset of the node table within the file
    data_offset: usize,
    /// Node where IPv4 lookups begin
    v4_root: u32,
}

impl Database {
    /// Open a database file
    ///
    /// Plain files are memory-mapped; `.gz` files are decompressed into
    /// memory first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IpdbError> {
        let path = path.as_ref();

        if file_reader::is_gzip(path) {
            let data = file_reader::read_all(path).map_err(|e| {
                IpdbError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            return Self::from_storage(DatabaseStorage::Owned(data));
        }

        let file = File::open(path)
            .map_err(|e| IpdbError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

        let len = file
            .metadata()
            .map_err(|e| IpdbError::Io(format!("Failed to stat {}: {}", path.display(), e)))?
            .len();
        if len == 0 {
            // Zero-length mappings are rejected by the OS; let the header
            // parser report the short file instead.
            return Self::from_storage(DatabaseStorage::Owned(Vec::new()));
        }

        // SAFETY: the mapping is read-only and lives as long as the Database.
        // Truncating the file underneath a running process is not supported.
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| IpdbError::Io(format!("Failed to mmap {}: {}", path.display(), e)))?;

        Self::from_storage(DatabaseStorage::Mmap(mmap))
    }

    /// Create database from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, IpdbError> {
        Self::from_storage(DatabaseStorage::Owned(data))
    }

    fn from_storage(storage: DatabaseStorage) -> Result<Self, IpdbError> {
        let bytes = storage.as_slice();
        let (header, data_offset) = Header::from_file(bytes)?;

        let tree = SearchTree::load(
            &bytes[data_offset..],
            header.node_count,
            header.ip_version.supports_ipv4(),
        )?;
        let v4_root = tree.v4_root();

        log::debug!(
            "loaded ipdb: {} bytes, build {}, {} nodes, {} languages, {} fields, v4 root {}",
            bytes.len(),
            header.build,
            header.node_count,
            header.languages.len(),
            header.fields.len(),
            v4_root
        );

        Ok(Self {
            data: storage,
            header,
            data_offset,
            v4_root,
        })
    }

    /// Node table followed by the record blob
    fn body(&self) -> &[u8] {
        &self.data.as_slice()[self.data_offset..]
    }

    fn tree(&self) -> SearchTree<'_> {
        SearchTree::with_v4_root(self.body(), self.header.node_count, self.v4_root)
    }

    fn resolver(&self) -> RecordResolver<'_> {
        RecordResolver::new(self.body(), self.header.node_count)
    }

    /// Look up an address string for one language
    ///
    /// Returns `Ok(None)` when the language is unknown or the address is
    /// not in the database. Malformed addresses and address families the
    /// database does not carry are `IpdbError::IpFormat`.
    pub fn lookup(&self, address: &str, language: &str) -> Result<Option<Vec<String>>, IpdbError> {
        let offset = match self.header.language_offset(language) {
            Some(offset) => offset,
            None => return Ok(None),
        };

        let addr = parse_address(address)?;
        self.find(addr, offset)
    }

    /// Look up an already-parsed address for one language
    pub fn lookup_ip(&self, addr: IpAddr, language: &str) -> Result<Option<Vec<String>>, IpdbError> {
        match self.header.language_offset(language) {
            Some(offset) => self.find(addr, offset),
            None => Ok(None),
        }
    }

    /// Look up an address and key the values by field name
    pub fn lookup_map(
        &self,
        address: &str,
        language: &str,
    ) -> Result<Option<HashMap<String, String>>, IpdbError> {
        Ok(self
            .lookup_info(address, language)?
            .map(LocationInfo::into_map))
    }

    /// Look up an address and wrap the values in a [`LocationInfo`]
    pub fn lookup_info(
        &self,
        address: &str,
        language: &str,
    ) -> Result<Option<LocationInfo>, IpdbError> {
        Ok(self
            .lookup(address, language)?
            .map(|values| LocationInfo::new(&self.header.fields, values)))
    }

    fn find(&self, addr: IpAddr, language_offset: usize) -> Result<Option<Vec<String>>, IpdbError> {
        self.check_family(addr)?;

        let leaf = match self.tree().descend(address_bytes(addr).as_bytes())? {
            Some(leaf) => leaf,
            None => return Ok(None),
        };

        self.decode(leaf, language_offset).map(Some)
    }

    fn check_family(&self, addr: IpAddr) -> Result<(), IpdbError> {
        match addr {
            IpAddr::V4(_) if !self.supports_ipv4() => {
                Err(IpdbError::IpFormat("no support ipv4".to_string()))
            }
            IpAddr::V6(_) if !self.supports_ipv6() => {
                Err(IpdbError::IpFormat("no support ipv6".to_string()))
            }
            _ => Ok(()),
        }
    }

    fn decode(&self, leaf: u32, language_offset: usize) -> Result<Vec<String>, IpdbError> {
        let text = self.resolver().resolve(leaf)?;
        let values = select_language(
            text,
            language_offset,
            self.header.fields.len(),
            self.header.languages.len(),
        )?;
        Ok(values.into_iter().map(str::to_string).collect())
    }

    /// Enumerate every network in the database with its values
    ///
    /// IPv4 networks are listed from the IPv4 start node, IPv6 networks
    /// from the root (this includes the IPv4-mapped range). An unknown
    /// language yields an empty list.
    pub fn networks(&self, language: &str) -> Result<Vec<NetworkRecord>, IpdbError> {
        let offset = match self.header.language_offset(language) {
            Some(offset) => offset,
            None => return Ok(Vec::new()),
        };

        let tree = self.tree();
        let mut out = Vec::new();

        if self.supports_ipv4() {
            for leaf in tree.leaves(self.v4_root, 32)? {
                out.push(NetworkRecord {
                    network: IpAddr::V4(Ipv4Addr::from(leaf.bits as u32)),
                    prefix_len: leaf.prefix_len,
                    values: self.decode(leaf.leaf, offset)?,
                });
            }
        }

        if self.supports_ipv6() {
            for leaf in tree.leaves(0, 128)? {
                out.push(NetworkRecord {
                    network: IpAddr::V6(Ipv6Addr::from(leaf.bits)),
                    prefix_len: leaf.prefix_len,
                    values: self.decode(leaf.leaf, offset)?,
                });
            }
        }

        Ok(out)
    }

    /// Whether the database carries IPv4 data
    pub fn supports_ipv4(&self) -> bool {
        self.header.ip_version.supports_ipv4()
    }

    /// Whether the database carries IPv6 data
    pub fn supports_ipv6(&self) -> bool {
        self.header.ip_version.supports_ipv6()
    }

    /// Build time (seconds since the Unix epoch)
    pub fn build_time(&self) -> u64 {
        self.header.build
    }

    /// Field names, in the order lookups return values
    pub fn fields(&self) -> &[String] {
        &self.header.fields
    }

    /// Language codes, ordered by column offset
    pub fn languages(&self) -> Vec<&str> {
        self.header.languages_by_offset()
    }

    /// Parsed header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Node where IPv4 lookups begin
    pub fn v4_root(&self) -> u32 {
        self.v4_root
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("header", &self.header)
            .field("data_offset", &self.data_offset)
            .field("v4_root", &self.v4_root)
            .finish()
    }
}
