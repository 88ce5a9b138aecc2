use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "odcvmap")]
#[command(about = "Recompute derived energy, cost, carbon and valuation columns", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the stage pipeline over a building CSV and save it in place
    Run {
        /// Building dataset (CSV)
        data: PathBuf,

        /// Configuration file (defaults to the nearest .odcvmap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for timestamped backups (defaults to <data dir>/backups)
        #[arg(long = "backup-dir")]
        backup_dir: Option<PathBuf>,

        /// Run only the named stage; repeat to select several
        #[arg(long = "stage", value_name = "NAME")]
        stages: Vec<String>,

        /// Per-building override file (wins over data.overrides in the config)
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Save (with a backup) after every stage instead of once at the end
        #[arg(long = "save-each", conflicts_with = "dry_run")]
        save_each: bool,

        /// Compute and report without writing the dataset
        #[arg(long = "dry-run")]
        dry_run: bool,
    },

    /// List the stage catalogue with the columns each stage reads and writes
    Stages,

    /// Write a starter .odcvmap.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}
