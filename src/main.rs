mod ai;
mod analytics;
mod config;
mod db;
mod error;
mod import;
mod models;
mod normalize;
mod run;
mod suggest;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    init_tracing(&config.log_filter);
    run::as_cli(&args, &config)
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
