// SPDX-FileCopyrightText: 2026 Ticketry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticketry - a Discord support-ticket bot.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};

/// Ticketry - a Discord support-ticket bot.
#[derive(Parser, Debug)]
#[command(name = "ticketry", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to Discord and serve ticket interactions.
    Serve,
    /// Validate the configuration and print a summary.
    Check,
    /// Open the database and apply pending migrations.
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ticketry_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ticketry_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            if let Err(errors) = ticketry_config::validate_serve(&config) {
                ticketry_config::render_errors(&errors);
                std::process::exit(1);
            }
            serve::run_serve(config).await
        }
        Some(Commands::Check) => {
            println!("{}", check::summary(&config));
            Ok(())
        }
        Some(Commands::Migrate) => check::run_migrate(&config).await,
        None => {
            println!("ticketry: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
