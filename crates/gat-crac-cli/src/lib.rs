pub mod cli;
pub mod config;
pub mod import;

pub use cli::{Cli, Commands, ReportFormat};
pub use config::{load_config, CracConfig, LoggingConfig};
