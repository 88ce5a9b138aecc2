use anyhow::Result;
use clap::Parser;
use odcvmap::cli::{Cli, Commands};
use odcvmap::commands::{self, RunConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            data,
            config,
            backup_dir,
            stages,
            overrides,
            save_each,
            dry_run,
        } => {
            let run = RunConfig {
                data,
                config,
                backup_dir,
                stages,
                overrides,
                save_each,
                dry_run,
            };
            commands::handle_run(run)?;
            Ok(())
        }
        Commands::Stages => {
            commands::print_stages();
            Ok(())
        }
        Commands::Init { force } => commands::init_config(force),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
