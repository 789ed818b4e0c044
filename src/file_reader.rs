//! Whole-file reading with automatic gzip decompression
//!
//! Databases are distributed both raw and gzip-compressed. Files ending in
//! `.gz` (case-insensitive) are inflated into memory; everything else is
//! left to the caller, which memory-maps it.
//!
//! # Example
//!
//! ```rust,no_run
//! use ipdb::file_reader;
//!
//! let bytes = file_reader::read_all("ipv4_city.ipdb.gz")?;
//! println!("{} bytes after decompression", bytes.len());
//! # Ok::<(), std::io::Error>(())
//! ```

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Buffer size for file reading (128KB)
const BUFFER_SIZE: usize = 128 * 1024;

/// Whether a path names a gzip-compressed file, judged by extension
pub fn is_gzip<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Read a whole file into memory, decompressing `.gz` files
///
/// # Errors
///
/// Returns an error if:
/// - The file doesn't exist
/// - Permission denied
/// - Invalid gzip data (for .gz files)
pub fn read_all<P: AsRef<Path>>(path: P) -> io::Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut data = Vec::new();

    if is_gzip(path) {
        let mut decoder = GzDecoder::new(BufReader::with_capacity(BUFFER_SIZE, file));
        decoder.read_to_end(&mut data)?;
    } else {
        let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
        reader.read_to_end(&mut data)?;
    }

    Ok(data)
}
