mod cli_utils;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{cmd_dump, cmd_inspect, cmd_query};

#[derive(Parser)]
#[command(name = "ipdb")]
#[command(
    about = "Query ipdb IP geolocation databases",
    long_about = "ipdb - Read-only query tool for ipdb IP geolocation databases\n\n\
    Looks up IPv4/IPv6 addresses in an ipdb file and prints the location/ISP\n\
    fields stored for them in the requested language.\n\n\
    Examples:\n\
      ipdb query ipv4_city.ipdb 123.123.123.123\n\
      ipdb query ipv4_city.ipdb 123.123.123.123 --language EN --json\n\
      ipdb inspect ipv4_city.ipdb\n\
      ipdb dump ipv4_city.ipdb -o networks.csv"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up an IP address
    Query {
        /// Path to the ipdb database (.ipdb or .ipdb.gz)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// IPv4 or IPv6 address to look up
        #[arg(value_name = "ADDRESS")]
        address: String,

        /// Language code of the returned fields
        #[arg(short, long, default_value = "CN")]
        language: String,

        /// Print a JSON object instead of `field: value` lines
        #[arg(long)]
        json: bool,

        /// Quiet mode - no output, only exit code (0 = found, 1 = not found)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show database metadata
    Inspect {
        /// Path to the ipdb database (.ipdb or .ipdb.gz)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export every network in the database as CSV
    Dump {
        /// Path to the ipdb database (.ipdb or .ipdb.gz)
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Language code of the exported fields
        #[arg(short, long, default_value = "CN")]
        language: String,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            database,
            address,
            language,
            json,
            quiet,
        } => cmd_query(database, address, language, json, quiet),
        Commands::Inspect { database, json } => cmd_inspect(database, json),
        Commands::Dump {
            database,
            language,
            output,
        } => cmd_dump(database, language, output),
    }
}
