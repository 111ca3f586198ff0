//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Cli`] - top-level arguments and the [`Command`] to run
//! - [`AnalysisArgs`] - input, identity and filter flags shared by analysis commands
//! - [`AddRuleArgs`] - arguments for appending a merge rule to a rules file
//! - [`OutputFormat`] - `--format` values, convertible to [`crate::format::OutputFormat`]
//!
//! ```rust
//! use clap::Parser;
//! use threadline::cli::{Cli, Command};
//!
//! let cli = Cli::parse_from(["threadline", "search", "sms.jsonl", "mike", "--me", "+15550000000"]);
//! match cli.command {
//!     Command::Search { query, common } => {
//!         assert_eq!(query, "mike");
//!         assert_eq!(common.me.as_deref(), Some("+15550000000"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::message::ContactIdentity;

/// Resolve contact identities, split SMS histories into conversation
/// threads, and measure response times.
#[derive(Parser, Debug, Clone)]
#[command(name = "threadline")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    threadline threads sms.jsonl --me +15550000000 --timeout 45m
    threadline threads sms.jsonl --me +15550000000 --stats
    threadline responses sms.csv --me +15550000000 -o responses.csv
    threadline duplicates sms.json --me +15550000000
    threadline search sms.json \"mike\" --me +15550000000
    threadline add-rule --rules rules.json \"Mike|5551234567\" \"Michael Smith|+15551234567\" \"Michael Smith|+15551234567\"
    threadline merge sms.json --rules rules.json -o merged.jsonl")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List conversation threads
    Threads {
        #[command(flatten)]
        common: AnalysisArgs,

        /// Print aggregate thread statistics instead of the thread list
        #[arg(long)]
        stats: bool,
    },

    /// Per-contact response times in both directions
    Responses {
        #[command(flatten)]
        common: AnalysisArgs,
    },

    /// Contacts that look like the same person
    Duplicates {
        #[command(flatten)]
        common: AnalysisArgs,
    },

    /// Fuzzy-search contacts by name or phone
    Search {
        #[command(flatten)]
        common: AnalysisArgs,

        /// Name fragment or phone digits
        query: String,
    },

    /// Write messages with merge rules applied
    Merge {
        #[command(flatten)]
        common: AnalysisArgs,
    },

    /// Append a merge rule to a rules file
    AddRule(AddRuleArgs),
}

/// Flags shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Path to message history (.json, .jsonl, .ndjson, .csv)
    pub input: String,

    /// Your own phone number (excluded from contact lists)
    #[arg(long, value_name = "PHONE")]
    pub me: Option<String>,

    /// Merge rules file (JSON array), applied after rules from --config
    #[arg(long, value_name = "FILE")]
    pub rules: Option<String>,

    /// Analysis config file (JSON); flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Thread inactivity timeout: 90s, 45m, 2h, 1d or plain minutes
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Minimum messages per thread
    #[arg(long, value_name = "N")]
    pub min_length: Option<usize>,

    /// Only messages on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Only messages on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Only messages with this contact (name or phone)
    #[arg(long, value_name = "CONTACT")]
    pub contact: Option<String>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (default: from output extension, else json)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Arguments for `add-rule`.
#[derive(Args, Debug, Clone)]
pub struct AddRuleArgs {
    /// Rules file to update (created if missing)
    #[arg(long, value_name = "FILE")]
    pub rules: String,

    /// Source identity as NAME|PHONE
    pub source: ContactIdentity,

    /// Target identity as NAME|PHONE
    pub target: ContactIdentity,

    /// Canonical result identity as NAME|PHONE
    pub result: ContactIdentity,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// CSV with semicolon delimiter
    Csv,

    /// Pretty-printed JSON array
    #[default]
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::format::OutputFormat::from(*self).fmt(f)
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
