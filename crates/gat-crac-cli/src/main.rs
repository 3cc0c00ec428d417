use anyhow::Result;
use clap::Parser;
use gat_crac_cli::{
    cli::{Cli, Commands},
    config::load_config,
    import::{run_import, ImportArgs},
};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    let level = cli
        .log_level
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| config.logging.level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Import {
            dataset,
            network,
            timestamp,
            threads,
            format,
            output,
        } => {
            let mut import = config.import;
            if let Some(threads) = threads {
                import = import.with_threads(threads);
            }
            let args = ImportArgs {
                dataset,
                network,
                timestamp,
                format,
                output,
            };
            run_import(&args, import)
        }
    }
}
