use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Import security-analysis inputs into a security model",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long)]
    pub log_level: Option<tracing::Level>,

    /// TOML configuration file with `[import]` and `[logging]` sections
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one import pass over a dataset at a snapshot timestamp
    Import {
        /// Dataset of source documents (JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        dataset: PathBuf,
        /// Network topology (JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        network: PathBuf,
        /// Snapshot timestamp (RFC 3339, or YYYY-MM-DD[THH:MM[:SS]] in UTC)
        #[arg(long)]
        timestamp: String,
        /// Worker threads per stage (0 = one per CPU, 1 = sequential)
        #[arg(long)]
        threads: Option<usize>,
        /// Report format written to stdout
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// Write the committed security model to this file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}
