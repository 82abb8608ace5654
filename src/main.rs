//! Fastly CLI - manage logging endpoints and VCL snippets of Fastly services

mod api;
mod cli;
mod commands;
mod config;
mod error;
mod output;
mod resolve;

#[cfg(test)]
mod testing;

use std::io::{self, Write};

use clap::Parser;
use cli::Cli;
use config::Globals;
use output::ErrorReport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // .env must be loaded before clap reads env-backed flags
    let env_loaded = config::load_env();

    let cli = Cli::parse();
    setup_subscriber(cli.globals.verbose);

    match env_loaded {
        Ok(true) => tracing::debug!("loaded .env"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "failed to read .env"),
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            eprintln!("Error: no command provided. Use --help for usage.");
            std::process::exit(1);
        }
    };

    let globals = match Globals::from_args(&cli.globals) {
        Ok(g) => g,
        Err(e) => fail(&e.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = commands::run(command, &globals, &mut out).await;
    let _ = out.flush();

    if let Err(e) = result {
        tracing::debug!(recorded = globals.errlog.entries().len(), "error log");
        fail(&e);
    }
}

fn setup_subscriber(verbose: bool) {
    let default = if verbose { "fastly=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn fail(err: &anyhow::Error) -> ! {
    let report = ErrorReport::from_error(err);
    tracing::debug!(category = %report.cat, "command failed");
    let _ = report.write(&mut io::stderr());
    std::process::exit(report.exit_code());
}
