// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hireflow - recruitment agent runtime.
//!
//! This is the binary entry point: it loads configuration, builds the
//! runtime, and runs one subcommand against it.

mod credentials;
mod doctor;
mod send;
mod status;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hireflow_config::HireflowConfig;

/// Hireflow - recruitment agent runtime.
#[derive(Parser, Debug)]
#[command(name = "hireflow", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the XDG search path.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show backends, plugins, credentials, calendars, and agents.
    Status {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Send an action to an agent and print its reply.
    Send {
        /// Target agent id (e.g. "generator").
        target: String,
        /// Action name (e.g. "generate").
        action: String,
        /// JSON payload.
        #[arg(default_value = "{}")]
        data: String,
    },
    /// List discovered and loaded plugins.
    Plugins,
    /// Inspect configured credentials.
    Credentials {
        #[command(subcommand)]
        action: CredentialAction,
    },
    /// Run diagnostic checks.
    Doctor {
        /// Also contact the active backend.
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CredentialAction {
    /// List services with masked values.
    List,
    /// Show access counts for one service.
    Usage { service: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => hireflow_config::load_and_validate_path(path),
        None => hireflow_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            hireflow_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.runtime.log_level);

    let result = match cli.command {
        Some(Commands::Status { json, plain }) => status::run_status(config, json, plain).await,
        Some(Commands::Send {
            target,
            action,
            data,
        }) => send::run_send(config, &target, &action, &data).await,
        Some(Commands::Plugins) => status::run_plugins(config).await,
        Some(Commands::Credentials { action }) => match action {
            CredentialAction::List => credentials::run_list(&config),
            CredentialAction::Usage { service } => {
                credentials::run_usage(config, &service).await
            }
        },
        Some(Commands::Doctor { deep, plain }) => doctor::run_doctor(config, deep, plain).await,
        None => {
            println!("hireflow: use --help for available commands");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hireflow: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hireflow={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Shared helper for subcommands that need a fully built runtime.
async fn build_runtime(config: HireflowConfig) -> hireflow_agent::Runtime {
    hireflow_agent::Runtime::from_config(config).await
}
