use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use crate::cli_utils::{format_families, format_unix_timestamp, open_database};

pub fn cmd_inspect(database: PathBuf, json_output: bool) -> Result<()> {
    let db = open_database(&database)?;
    let header = db.header();

    if json_output {
        let languages: Vec<_> = db
            .languages()
            .into_iter()
            .map(|code| json!({ "code": code, "offset": header.language_offset(code) }))
            .collect();

        let output = json!({
            "file": database.display().to_string(),
            "build": header.build,
            "build_time": format_unix_timestamp(header.build),
            "ip_version": header.ip_version,
            "ipv4": db.supports_ipv4(),
            "ipv6": db.supports_ipv6(),
            "languages": languages,
            "fields": db.fields(),
            "node_count": header.node_count,
            "total_size": header.total_size,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Database:    {}", database.display());
        println!(
            "Build time:  {} ({})",
            format_unix_timestamp(header.build),
            header.build
        );
        println!("Families:    {}", format_families(&db));
        println!("Languages:   {}", db.languages().join(", "));
        println!("Node count:  {}", header.node_count);
        println!("Total size:  {} bytes", header.total_size);
        println!();
        println!("Fields ({}):", db.fields().len());
        for (i, field) in db.fields().iter().enumerate() {
            println!("  {:>2}. {}", i + 1, field);
        }
    }

    Ok(())
}
