// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leadgate - conversational lead qualification filter.
//!
//! Binary entry point: loads configuration, initializes logging, selects the
//! model provider and runs either the interactive shell or a one-shot
//! classification.

mod classify;
mod provider;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use leadgate_config::LeadgateConfig;
use leadgate_qualifier::LeadQualifier;

/// Leadgate - qualify inbound leads with a language model.
#[derive(Parser, Debug)]
#[command(name = "leadgate", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard search path.
    #[arg(long, short, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive qualification session (default).
    Shell {
        /// Sender identifier checked against the blacklist.
        #[arg(long)]
        identifier: Option<String>,
    },
    /// Classify a single message and print the result as JSON.
    Classify {
        message: String,
        /// Sender identifier checked against the blacklist.
        #[arg(long)]
        identifier: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => leadgate_config::load_and_validate_path(path),
        None => leadgate_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            leadgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(
    command: Option<Commands>,
    config: &LeadgateConfig,
) -> Result<(), leadgate_core::LeadgateError> {
    let provider = provider::build_provider(config)?;
    let qualifier = LeadQualifier::from_config(provider, config);

    match command {
        Some(Commands::Classify {
            message,
            identifier,
        }) => classify::run_classify(qualifier, &message, identifier.as_deref()).await,
        Some(Commands::Shell { identifier }) => {
            shell::run_shell(qualifier, &config.agent.name, identifier).await
        }
        None => shell::run_shell(qualifier, &config.agent.name, None).await,
    }
}

/// Logs go to stderr so shell and JSON output on stdout stay clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leadgate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config = leadgate_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.agent.name, "leadgate");
    }

    #[test]
    fn cli_parses_classify_with_identifier() {
        let cli = Cli::try_parse_from([
            "leadgate",
            "classify",
            "do you open on saturday?",
            "--identifier",
            "+34 600 123 456",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Classify {
                message,
                identifier,
            }) => {
                assert_eq!(message, "do you open on saturday?");
                assert_eq!(identifier.as_deref(), Some("+34 600 123 456"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_defaults_to_shell() {
        let cli = Cli::try_parse_from(["leadgate", "--config", "/tmp/leadgate.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/leadgate.toml")));
    }
}
