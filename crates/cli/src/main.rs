// ordermatch CLI - fuzzy order/transaction matching
// Thin wrapper around ordermatch-recon; all matching logic lives there.

mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use ordermatch_recon::MatchError;

use exit_codes::{exit_code_for, EXIT_ERROR, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "ordermatch")]
#[command(about = "Fuzzy-match customer orders against bank transactions")]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match orders against transactions and report groups and leftovers
    #[command(after_help = "\
Examples:
  ordermatch run request.json
  ordermatch run request.json --json
  ordermatch run --orders orders.csv --transactions bank.csv --output report.json
  ordermatch run request.json --config matcher.toml --strict")]
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Matcher config (TOML); defaults apply when omitted
        #[arg(long, env = "ORDERMATCH_CONFIG")]
        config: Option<PathBuf>,

        /// Output the JSON report to stdout instead of only the summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when any order or transaction is left unmatched
        #[arg(long)]
        strict: bool,
    },

    /// Check input structure without scoring
    #[command(after_help = "\
Examples:
  ordermatch validate request.json
  ordermatch validate --orders orders.csv --transactions bank.csv")]
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Score a single order/transaction pair
    #[command(after_help = "\
Examples:
  ordermatch score --order '{\"customer\":\"Brian Bell\",\"orderId\":\"A100\"}' \\
                   --transaction '{\"customer\":\"Bell Brian\",\"orderId\":\"A100\"}'")]
    Score {
        /// Order as a JSON object
        #[arg(long)]
        order: String,

        /// Transaction as a JSON object
        #[arg(long)]
        transaction: String,

        /// Matcher config (TOML); defaults apply when omitted
        #[arg(long, env = "ORDERMATCH_CONFIG")]
        config: Option<PathBuf>,

        /// Output JSON instead of the text breakdown
        #[arg(long)]
        json: bool,
    },

    /// Matcher config utilities
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Parse and validate a matcher config
    #[command(after_help = "\
Examples:
  ordermatch config check matcher.toml")]
    Check {
        /// Path to the matcher TOML file
        config: PathBuf,
    },
}

/// Where records come from: one request document, or separate list files.
#[derive(Args)]
pub struct InputArgs {
    /// Request document: {"orders": [...], "transactions": [...]}
    #[arg(conflicts_with_all = ["orders", "transactions"])]
    pub input: Option<PathBuf>,

    /// Orders file (.csv, otherwise a JSON array)
    #[arg(long)]
    pub orders: Option<PathBuf>,

    /// Transactions file (.csv, otherwise a JSON array)
    #[arg(long)]
    pub transactions: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { input, config, json, output, strict } => {
            commands::cmd_run(input, config, json, output, strict)
        }
        Commands::Validate { input } => commands::cmd_validate(input),
        Commands::Score { order, transaction, config, json } => {
            commands::cmd_score(order, transaction, config, json)
        }
        Commands::Config(ConfigCommands::Check { config }) => commands::cmd_config_check(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<MatchError> for CliError {
    fn from(err: MatchError) -> Self {
        let hint = match &err {
            MatchError::EmptyInput => Some("pass at least one order or transaction".to_string()),
            MatchError::MissingField { .. } => Some("every record needs a non-empty orderId".to_string()),
            _ => None,
        };
        Self { code: exit_code_for(&err), message: err.to_string(), hint }
    }
}
