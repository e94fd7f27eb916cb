// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use revenant_cli::commands::{payment_info, revive, salvage, verify_payment};
use revenant_cli::files::{collect_files, parse_metadata, read_file};
use revenant_node::config::NodeConfig;
use revenant_node::server::AppState;
use revenant_node::telemetry::init_logging;

#[derive(Parser)]
#[command(name = "revenant")]
#[command(about = "Revenant - salvage agent memory to a write-once ledger and revive it later", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Salvage a directory of agent files, or a single file.
    /// Without a ledger credential in the environment this runs in demo mode.
    #[command(group(ArgGroup::new("source").required(true).args(["dir", "file"])))]
    Salvage {
        /// Directory to salvage recursively. Dot-files are skipped.
        #[arg(long, short)]
        dir: Option<PathBuf>,

        /// Single file to salvage
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Extra metadata as key=value (repeatable)
        #[arg(long = "meta", short)]
        meta: Vec<String>,
    },
    /// Revive a salvaged state by ledger id
    Revive {
        id: String,

        /// Restore the revived files into this directory
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Check that a transaction paid the configured recipient
    VerifyPayment {
        signature: String,

        /// Minimum amount in base units
        #[arg(long, short, default_value_t = 0)]
        expected: u64,
    },
    /// Show where and how to pay
    PaymentInfo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging("revenant_cli=info,revenant_core=info,revenant_node=warn");

    let cli = Cli::parse();
    let cfg = NodeConfig::from_env()?;
    let state = AppState::from_config(&cfg)?;

    match cli.command {
        Commands::Salvage { dir, file, meta } => {
            let files = match (dir, file) {
                (Some(dir), _) => collect_files(&dir)?,
                (None, Some(file)) => vec![read_file(&file)?],
                (None, None) => anyhow::bail!("one of --dir or --file is required"),
            };
            let metadata = parse_metadata(&meta)?;
            salvage::run(&state.salvage, files, metadata).await?;
        }
        Commands::Revive { id, out } => {
            revive::run(&state.revival, &id, out.as_deref()).await?;
        }
        Commands::VerifyPayment { signature, expected } => {
            let result = verify_payment::run(&state.payments, &signature, expected).await?;
            if !result.valid {
                std::process::exit(1);
            }
        }
        Commands::PaymentInfo => {
            payment_info::run(&state.payments);
        }
    }
    Ok(())
}
