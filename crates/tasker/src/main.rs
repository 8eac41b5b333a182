// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Social Tasker - task completion scoring with a social leaderboard.
//!
//! This is the binary entry point for the backend service.

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tasker_config::TaskerConfig;

/// Social Tasker backend.
#[derive(Parser, Debug)]
#[command(name = "tasker", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the HTTP service (default).
    Serve,
    /// Validate configuration and print the effective values.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> TaskerConfig {
    let loaded = match path {
        Some(path) => tasker_config::load_and_validate_path(path),
        None => tasker_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            tasker_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("tasker: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => match toml::to_string_pretty(&config.redacted()) {
            Ok(rendered) => {
                eprintln!("tasker: configuration is valid");
                println!("{rendered}");
            }
            Err(e) => {
                eprintln!("tasker: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["tasker"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn check_config_accepts_a_path() {
        let cli =
            Cli::try_parse_from(["tasker", "check-config", "--config", "/tmp/tasker.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::CheckConfig));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tasker.toml")));
    }

    #[test]
    fn default_config_renders_without_secrets() {
        let mut config = tasker_config::load_and_validate_str("").unwrap();
        config.server.api_key = Some("hunter2".into());
        let rendered = toml::to_string_pretty(&config.redacted()).unwrap();
        assert!(rendered.contains("[server]"));
        assert!(!rendered.contains("hunter2"));
    }
}
