//! clonekit CLI Binary
//!
//! Command-line interface for clone address prediction, the implementation
//! registry and Merkle allowlist tooling.

use anyhow::Context;
use clap::Parser;
use clonekit::cli::{Cli, RunContext};
use clonekit::config::{ClonekitConfig, ConfigLoader};
use clonekit::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config: {:#}", e);
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &config);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    debug!("clonekit CLI starting");

    let context = match RunContext::with_config(cli.workspace.clone(), config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing workspace: {}", e);
            eprintln!("{}", clonekit::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            debug!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", clonekit::cli::map_error(&e));
            process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClonekitConfig> {
    match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => ConfigLoader::load(&cli.workspace).with_context(|| {
            format!(
                "failed to load configuration for workspace {}",
                cli.workspace.display()
            )
        }),
    }
}

/// Fold CLI flags over the configured logging section.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, config: &ClonekitConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if logging.file.is_relative() {
        logging.file = cli.workspace.join(&logging.file);
    }
    logging
}
