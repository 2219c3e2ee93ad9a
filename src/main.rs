mod cli;
mod commands;
mod console;
mod error;
mod logging;
mod menu;

use crate::cli::{Cli, Command};
use crate::console::Console;
use crate::error::{ErrorKind, Result};
use bookshelf_catalog::{CatalogStore, Manager, Report};
use bookshelf_config::{Config, Overrides};
use bookshelf_storage::BackendHandle;
use bookshelf_storage::backend::{LocalBackend, ReadOnlyBackend};
use clap::Parser;
use exn::ResultExt;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.log_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Full error tree, including the crate error that was raised first.
            tracing::debug!("{err:?}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        data_dir: cli.data_dir,
        catalog_file: cli.catalog_file,
        read_only: cli.read_only.then_some(true),
    };
    let config = Config::load(cli.config.as_deref(), overrides).or_raise(|| ErrorKind::Config)?;
    tracing::info!(
        catalog = %config.catalog_path().display(),
        read_only = config.read_only,
        "Configuration loaded"
    );

    let local: BackendHandle = Arc::new(LocalBackend::new("local", &config.data_dir).or_raise(|| ErrorKind::Storage)?);
    let backend: BackendHandle = match config.read_only {
        true => Arc::new(ReadOnlyBackend::new(local)),
        false => local,
    };

    let (mut manager, report) = Manager::initialize(CatalogStore::new(backend), config.catalog_file.clone());
    announce(&report, &config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    commands::run(cli.command.unwrap_or(Command::Menu), &mut manager, &mut console)
}

/// Tell the user about anything [`Manager::initialize`] had to work around.
fn announce(report: &Report, config: &Config) {
    if let Some(err) = &report.load_problem {
        eprintln!("Warning: {err}; starting with an empty catalog.");
    }
    if let Some(target) = report.quarantined.as_ref().filter(|_| !config.read_only) {
        eprintln!("The unreadable catalog was kept as {}.", config.data_dir.join(target).display());
    }
    if report.repaired() {
        eprintln!(
            "Catalog repaired: {} incomplete and {} duplicate-id records dropped, ids renumbered from 1.",
            report.dropped_blank, report.dropped_duplicate_ids
        );
    }
    if let Some(err) = &report.save_problem {
        eprintln!("Warning: {err}; changes will only last for this session.");
    }
}
