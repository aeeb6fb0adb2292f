//! CLI argument definitions for `proved-effectifs`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use proved_effectifs::config::ConfigOverrides;
use proved_effectifs::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(Level::from(*self).as_str())
    }
}

/// Output format for tree documents
#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// TOML, usable as a `save` input file
    Toml,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `db_path`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Save a unit's effectifs for a school year.
    ///
    /// Creates the record or replaces the tree of an existing one.
    Save {
        /// Administrative unit identifier
        #[arg(short, long, value_name = "UNIT")]
        unit: String,

        /// School year, e.g. 2024-2025
        #[arg(short, long, value_name = "YYYY-YYYY")]
        year: String,

        /// Effectif tree document (.json, otherwise TOML)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,
    },
    /// Show last year's effectifs (or the default baseline) for a school year.
    Previous {
        /// Administrative unit identifier
        #[arg(short, long, value_name = "UNIT")]
        unit: String,

        /// Target school year; the year before it is looked up
        #[arg(short, long, value_name = "YYYY-YYYY")]
        year: String,
    },
    /// List a unit's stored effectifs, newest school year first.
    History {
        /// Administrative unit identifier
        #[arg(short, long, value_name = "UNIT")]
        unit: String,
    },
    /// Show the stored effectifs of one school year.
    Show {
        /// Administrative unit identifier
        #[arg(short, long, value_name = "UNIT")]
        unit: String,

        /// School year, e.g. 2024-2025
        #[arg(short, long, value_name = "YYYY-YYYY")]
        year: String,
    },
    /// Compute growth rates of a school year against the year before.
    Growth {
        /// Administrative unit identifier
        #[arg(short, long, value_name = "UNIT")]
        unit: String,

        /// School year, e.g. 2024-2025
        #[arg(short, long, value_name = "YYYY-YYYY")]
        year: String,

        /// Current-year tree document; the stored record is used when omitted
        #[arg(value_name = "FILE")]
        input_file: Option<PathBuf>,
    },
    /// Print the default baseline tree (a template for `save` documents).
    Baseline {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = DocumentFormat::Toml)]
        format: DocumentFormat,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "effectifs",
    about = "PROVED annual effectif tracking and growth rates",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the effectif database path
    #[arg(long = "db-path", value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Override how long writers wait for the database lock
    #[arg(long = "busy-timeout-ms", value_name = "MS")]
    pub busy_timeout_ms: Option<u64>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            db_path: self
                .db_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli(command: Command) -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            db_path: None,
            busy_timeout_ms: None,
            command,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = bare_cli(Command::Config { subcommand: None }).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.db_path.is_none());
        assert!(overrides.busy_timeout_ms.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut cli = bare_cli(Command::Config { subcommand: None });
        cli.config_level = Some(LogLevelArg::Debug);
        cli.config_log_file = Some(PathBuf::from("/tmp/test.log"));
        cli.config_verbose = Some(true);
        cli.db_path = Some(PathBuf::from("/data/effectifs.sqlite3"));
        cli.busy_timeout_ms = Some(250);

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(
            overrides.db_path,
            Some("/data/effectifs.sqlite3".to_string())
        );
        assert_eq!(overrides.busy_timeout_ms, Some(250));
    }

    #[test]
    fn test_parse_save_command() {
        let cli = Cli::try_parse_from([
            "effectifs",
            "--db-path",
            "/tmp/e.sqlite3",
            "save",
            "--unit",
            "proved-kwilu-1",
            "--year",
            "2024-2025",
            "tree.toml",
        ])
        .unwrap();

        match cli.command {
            Command::Save {
                unit,
                year,
                input_file,
            } => {
                assert_eq!(unit, "proved-kwilu-1");
                assert_eq!(year, "2024-2025");
                assert_eq!(input_file, PathBuf::from("tree.toml"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/e.sqlite3")));
    }

    #[test]
    fn test_growth_file_is_optional() {
        let cli =
            Cli::try_parse_from(["effectifs", "growth", "-u", "u1", "-y", "2024-2025"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Growth {
                input_file: None,
                ..
            }
        ));
    }
}
