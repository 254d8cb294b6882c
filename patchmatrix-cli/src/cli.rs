//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use patchmatrix_core::config::LOG_LEVELS;
use patchmatrix_suite::Suite;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "patchmatrix.toml";

/// patchmatrix -- patch test matrix generator.
///
/// Use `patchmatrix <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "patchmatrix", version, about, long_about = None)]
pub struct Cli {
    /// Path to the patchmatrix.toml configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true, value_parser = PossibleValuesParser::new(LOG_LEVELS))]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List suites and their instance counts.
    Suites,

    /// List templates with timeout, machine type and metadata keys.
    Templates,

    /// Print the test instances of one suite.
    Generate(GenerateArgs),

    /// Validate templates and the image catalog.
    Validate,

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- generate ----

/// Expand one suite into test instances.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Suite name (head, old, apt-head, apt-downgrade, yum-head, suse-head).
    pub suite: Suite,

    /// Include metadata values in text output.
    #[arg(long)]
    pub show_metadata: bool,
}

// ---- config ----

/// Manage patchmatrix configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, agent, catalog).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_suites() {
        let cli = Cli::try_parse_from(["patchmatrix", "suites"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Suites));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from(["patchmatrix", "generate", "apt-downgrade"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.suite, Suite::AptDowngrade);
                assert!(!args.show_metadata, "show_metadata should default to false");
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_show_metadata() {
        let cli = Cli::try_parse_from(["patchmatrix", "generate", "yum_head", "--show-metadata"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.suite, Suite::YumHead);
                assert!(args.show_metadata);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_unknown_suite() {
        let result = Cli::try_parse_from(["patchmatrix", "generate", "windows-head"]);
        assert!(result.is_err(), "unknown suite should be rejected");
    }

    #[test]
    fn test_cli_parse_generate_requires_suite() {
        let result = Cli::try_parse_from(["patchmatrix", "generate"]);
        assert!(result.is_err(), "suite argument is required");
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "patchmatrix",
            "-c",
            "/etc/patchmatrix.toml",
            "templates",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/patchmatrix.toml"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Templates));
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["patchmatrix", "config", "show", "--section", "agent"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(args) => match args.action {
                ConfigAction::Show { section } => assert_eq!(section.as_deref(), Some("agent")),
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["patchmatrix", "config", "validate"])
            .expect("parse succeeded");
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Validate
            })
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_log_level() {
        let result = Cli::try_parse_from(["patchmatrix", "suites", "--log-level", "verbose"]);
        assert!(result.is_err(), "verbose is not a log level");
    }

    #[test]
    fn test_cli_parse_invalid_output_format() {
        let result = Cli::try_parse_from(["patchmatrix", "suites", "--output", "yaml"]);
        assert!(result.is_err(), "yaml is not a supported output format");
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["patchmatrix"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
