//! Quay CLI - manifest resolver for binary-framework packages

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use quay::core::LocateError;
use quay::util::diagnostic::{emit, suggestions, Diagnostic};
use quay::{FetchError, ManifestError};

fn main() {
    let cli = Cli::parse();
    let color = commands::shell(&cli.global).use_color();

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("quay=debug")
    } else {
        EnvFilter::new("quay=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    let global = cli.global;
    match cli.command {
        Commands::Check(args) => commands::check::execute(args, &global),
        Commands::Fetch(args) => commands::fetch::execute(args, &global),
        Commands::Plan(args) => commands::plan::execute(args, &global),
        Commands::Tree(args) => commands::tree::execute(args, &global),
        Commands::Profiles => commands::profiles::execute(&global),
        Commands::Init(args) => commands::init::execute(args, &global),
        Commands::Clean(args) => commands::clean::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Render typed errors as diagnostics, everything else as the anyhow chain.
fn report(err: &anyhow::Error, color: bool) {
    if let Some(e) = err.downcast_ref::<ManifestError>() {
        emit(&e.to_diagnostic(), color);
    } else if let Some(e) = err.downcast_ref::<FetchError>() {
        emit(&e.to_diagnostic(), color);
    } else if let Some(e) = err.downcast_ref::<LocateError>() {
        let diagnostic = Diagnostic::error(e.to_string()).with_suggestion(suggestions::NO_MANIFEST);
        emit(&diagnostic, color);
    } else {
        eprintln!("error: {:#}", err);
    }
}
