use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli_utils::open_database;

pub fn cmd_dump(database: PathBuf, language: String, output: Option<PathBuf>) -> Result<()> {
    let db = open_database(&database)?;

    if !db.languages().contains(&language.as_str()) {
        bail!(
            "language '{}' not in database (available: {})",
            language,
            db.languages().join(", ")
        );
    }

    let networks = db
        .networks(&language)
        .with_context(|| format!("Failed to enumerate {}", database.display()))?;

    let sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["network".to_string()];
    header.extend(db.fields().iter().cloned());
    writer.write_record(&header)?;

    for network in &networks {
        let mut row = Vec::with_capacity(network.values.len() + 1);
        row.push(network.cidr());
        row.extend(network.values.iter().cloned());
        writer.write_record(&row)?;
    }
    writer.flush()?;

    if let Some(path) = output {
        eprintln!("Wrote {} networks to {}", networks.len(), path.display());
    }

    Ok(())
}
