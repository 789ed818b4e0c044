use anyhow::{Context, Result};
use ipdb::Database;
use std::path::Path;

/// Open a database, attaching the path to any error
pub fn open_database(path: &Path) -> Result<Database> {
    Database::open(path).with_context(|| format!("Failed to load database: {}", path.display()))
}

/// Human-readable list of supported address families
pub fn format_families(db: &Database) -> String {
    match (db.supports_ipv4(), db.supports_ipv6()) {
        (true, true) => "IPv4, IPv6".to_string(),
        (true, false) => "IPv4".to_string(),
        (false, true) => "IPv6".to_string(),
        (false, false) => "none".to_string(),
    }
}

pub fn format_unix_timestamp(timestamp: u64) -> String {
    let total_secs = timestamp;
    let days = total_secs / 86400;
    let remaining = total_secs % 86400;
    let hours = remaining / 3600;
    let remaining = remaining % 3600;
    let minutes = remaining / 60;
    let seconds = remaining % 60;

    // Calculate date from days since epoch (1970-01-01)
    let (year, month, day) = days_to_ymd(days);

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
        year, month, day, hours, minutes, seconds
    )
}

// Convert days since Unix epoch to year/month/day in constant time
// (proleptic Gregorian, counted in 400-year eras from 0000-03-01)
fn days_to_ymd(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;

    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = era * 400 + yoe + u64::from(month <= 2);
    (year, month, day)
}
