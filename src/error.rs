/// Error types for the ipdb library
use std::fmt;

/// Result type alias for ipdb operations
pub type Result<T> = std::result::Result<T, IpdbError>;

/// Main error type for ipdb operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpdbError {
    /// The database file is malformed (header, offsets, or record text)
    InvalidFormat(String),

    /// The address text is malformed, or its family is not in the database
    IpFormat(String),

    /// I/O errors while opening or reading a database
    Io(String),
}

impl IpdbError {
    /// True for errors caused by the caller's address rather than the database
    pub fn is_ip_format(&self) -> bool {
        matches!(self, IpdbError::IpFormat(_))
    }
}

impl fmt::Display for IpdbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpdbError::InvalidFormat(msg) => write!(f, "Invalid ipdb format: {}", msg),
            IpdbError::IpFormat(msg) => write!(f, "IP format error: {}", msg),
            IpdbError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for IpdbError {}

impl From<std::io::Error> for IpdbError {
    fn from(err: std::io::Error) -> Self {
        IpdbError::Io(err.to_string())
    }
}
