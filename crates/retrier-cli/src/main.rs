use clap::Parser;
use retrier_core::config::{self, RetrierConfig};
use retrier_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The log filter lives in the config, so load it first and report
    // what happened once logging is up.
    let loaded = config::load_or_init();
    let cfg = match &loaded {
        Ok(loaded) => loaded.config.clone(),
        Err(_) => RetrierConfig::default(),
    };

    // Initialize logging as early as possible; fall back to stderr.
    if logging::init_logging(cfg.log_filter.as_deref()).is_err() {
        logging::init_logging_stderr(cfg.log_filter.as_deref());
    }
    match &loaded {
        Ok(loaded) if loaded.created => {
            tracing::info!("created default config at {}", loaded.path.display())
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!("could not load config ({:#}); using defaults", err);
            eprintln!("retrier: could not load config ({:#}); using defaults", err);
        }
    }
    tracing::debug!("loaded config: {:?}", cfg);

    if let Err(err) = cli.command.run(&cfg).await {
        eprintln!("retrier error: {:#}", err);
        std::process::exit(1);
    }
}
