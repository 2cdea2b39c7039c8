// SPDX-FileCopyrightText: 2026 Mercato Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mercato - marketplace messaging demo CLI.
//!
//! This is the binary entry point. It wires the chat session, the in-memory
//! backend, and the change-feed listeners together and runs a scripted
//! two-user conversation.

mod demo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Mercato - marketplace messaging demo.
#[derive(Parser, Debug)]
#[command(name = "mercato", version, about, long_about = None)]
struct Cli {
    /// Path to a mercato.toml config file (overrides the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scripted two-user conversation against an in-memory backend.
    Demo,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match cli.config.as_deref() {
        Some(path) => mercato_config::load_and_validate_path(path),
        None => mercato_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            mercato_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Demo) => {
            if let Err(err) = demo::run(&config).await {
                eprintln!("mercato demo failed: {err}");
                std::process::exit(1);
            }
        }
        None => {
            println!("mercato: use --help for available commands");
        }
    }
}
