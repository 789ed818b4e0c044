use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli_utils::open_database;

pub fn cmd_query(
    database: PathBuf,
    address: String,
    language: String,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let db = open_database(&database)?;

    if !quiet && !db.languages().contains(&language.as_str()) {
        eprintln!(
            "Warning: language '{}' not in database (available: {})",
            language,
            db.languages().join(", ")
        );
    }

    let result = db
        .lookup_info(&address, &language)
        .with_context(|| format!("Query failed for: {}", address))?;

    let found = result.is_some();

    if quiet {
        // Quiet mode: no output, just exit code
        std::process::exit(if found { 0 } else { 1 });
    }

    match result {
        Some(info) if json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Some(info) => {
            let width = info.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            for (name, value) in info.iter() {
                println!("{:<width$}  {}", format!("{}:", name), value, width = width + 1);
            }
        }
        None if json => println!("null"),
        None => eprintln!("Not found: {}", address),
    }

    // Exit with appropriate code
    std::process::exit(if found { 0 } else { 1 });
}
