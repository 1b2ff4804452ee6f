//! Stevedore CLI - annotate repository artifacts with scan metadata.

use clap::Parser;
use stevedore_cli::commands;
use stevedore_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let formatter = Formatter::new(!cli.no_color);

    match cli.command {
        Command::Scan(args) => commands::execute_scan(args, &config, &formatter)?,
        Command::Reconcile(args) => commands::execute_reconcile(args, &config, &formatter)?,
        Command::Watch => {
            // Only the worker needs an async runtime
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::execute_watch(&config))?;
        }
        Command::Status => commands::execute_status(&config, &formatter)?,
        Command::Reset(args) => commands::execute_reset(&args.repo, &config, &formatter)?,
        Command::Properties(args) => commands::execute_properties(args, &config, &formatter)?,
    }

    Ok(())
}
