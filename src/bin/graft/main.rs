//! graft CLI - add contract data sources to subgraph manifests

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use graft::resolver::AddError;
use graft::util::diagnostic::{emit, Diagnostic};
use graft::util::shell::{ColorChoice, Shell};
use graft::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("graft=debug")
    } else {
        EnvFilter::new("graft=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, color));

    if let Err(e) = run(cli.command, &shell) {
        report(&e, shell.use_color());
        std::process::exit(1);
    }
}

fn run(command: Commands, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;

    match command {
        Commands::Add(args) => commands::add::execute(args, &ctx, shell),
    }
}

/// Print a failed command once, with a rich diagnostic for domain errors.
fn report(e: &anyhow::Error, color: bool) {
    match e.downcast_ref::<AddError>() {
        Some(err) => emit(&err.to_diagnostic(), color),
        None => emit(&Diagnostic::error(format!("{:#}", e)), color),
    }
}
