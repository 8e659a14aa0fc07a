//! Kebab POS CLI - one-off data migrations.
//!
//! # Usage
//!
//! ```bash
//! # Copy product/modifier-group links from one database to another
//! pos-cli migrate product-modifier-groups \
//!     --source-url postgres://... --dest-url postgres://...
//! ```
//!
//! # Commands
//!
//! - `migrate product-modifier-groups` - Copy `ProductModifierGroup` rows

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use kebab_pos_cli::commands;

#[derive(Parser)]
#[command(name = "pos-cli")]
#[command(author, version, about = "Kebab POS CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy data between databases
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Copy product/modifier-group links
    ProductModifierGroups {
        /// Source database URL (defaults to `SOURCE_DATABASE_URL`)
        #[arg(long)]
        source_url: Option<String>,

        /// Destination database URL (defaults to `DEST_DATABASE_URL`)
        #[arg(long)]
        dest_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::ProductModifierGroups {
                source_url,
                dest_url,
            } => {
                let report =
                    commands::migrate::product_modifier_groups(source_url, dest_url).await?;
                tracing::info!(
                    found = report.found,
                    inserted = report.inserted,
                    "Migration complete"
                );
            }
        },
    }
    Ok(())
}
