use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rustcip25::cip25::validate::validate_file;

#[derive(Parser)]
#[command(name = "rustcip25", version, about = "Validate and inspect CIP-25 NFT metadata")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a CIP-25 metadata file
    Validate {
        /// Path to the JSON metadata file
        file: PathBuf,
    },
    /// Validate a metadata file and print the typed result as JSON
    Show {
        /// Path to the JSON metadata file
        file: PathBuf,
        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate { file } => {
            let data = validate_file(&file)
                .with_context(|| format!("validation failed for {}", file.display()))?;
            println!(
                "{}: policy {} with {} asset(s)",
                file.display(),
                data.policy_id,
                data.assets.len()
            );
        }
        Command::Show { file, output } => {
            let data = validate_file(&file)
                .with_context(|| format!("validation failed for {}", file.display()))?;
            let rendered = serde_json::to_string_pretty(&data)?;
            match output {
                Some(path) => std::fs::write(&path, rendered)
                    .with_context(|| format!("could not write {}", path.display()))?,
                None => println!("{rendered}"),
            }
        }
    }
    Ok(())
}
