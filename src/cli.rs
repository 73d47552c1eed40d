use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "shimtrace",
    about = "Trace which members of shimmed API objects are touched, and with what values",
    version = env!("GIT_DESCRIBE")
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to shimtrace.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay probe scripts through an intercepting wrapper
    Probe {
        /// Script file, or directory of *.yaml scripts
        path: PathBuf,

        /// Output format (text streams access lines; json/yaml print a report)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Dispatch an event to a set of echo listeners
    Dispatch {
        /// Event name
        name: String,

        /// Event fields as a JSON object (or any JSON value with --raw)
        #[arg(long, short = 'f', default_value = "{}")]
        fields: String,

        /// Pass the payload through unchanged instead of building an event record
        #[arg(long)]
        raw: bool,

        /// Number of listeners to register
        #[arg(long, short = 'n', default_value_t = 1)]
        listeners: usize,

        /// Make the listener at this position (0-based) fail
        #[arg(long)]
        fail_at: Option<usize>,
    },

    /// Inspect the interception policy
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum PolicyAction {
    /// Report whether member names would be logged
    Check {
        /// Member names (Symbol.toStringTag etc. for symbols)
        #[arg(required = true)]
        members: Vec<String>,
    },

    /// Show the active mode and exclusion list
    Show {
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}
