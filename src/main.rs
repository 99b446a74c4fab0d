//! # Advodir
//!
//! Entry point for the advodir advocate-directory lookup service. Parses
//! CLI commands, validates the environment, loads the advocate dataset and
//! hands off to the server module.

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod env;
mod query;
mod rate_limiter;
mod routing;
mod server;
mod store;
#[cfg(test)]
mod tests;

use crate::env::{AppConfig, validate_environment};
use crate::rate_limiter::RateLimiter;
use crate::store::AdvocateStore;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: AdvocateStore,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: AppConfig,
}

#[derive(Parser)]
#[command(name = "advodir")]
#[command(about = "The Advodir advocate directory service CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the directory service
    #[command(name = "start")]
    Start,
    /// Validate environment configuration and print the result without serving
    #[command(name = "validate-env")]
    ValidateEnv,
}

#[tokio::main]
async fn main() {
    // Honor RUST_LOG when set, otherwise ADVODIR_LOG_LEVEL, otherwise info.
    let default_level =
        std::env::var("ADVODIR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start => {
            let config = match validate_environment() {
                Ok(config) => config,
                Err(errors) => {
                    for error in errors {
                        eprintln!("Environment validation error: {}", error);
                    }
                    std::process::exit(1);
                }
            };

            let store = match AdvocateStore::load(&config.data_file) {
                Ok(store) => store,
                Err(e) => {
                    eprintln!(
                        "Failed to load advocate data from {}: {}",
                        config.data_file, e
                    );
                    std::process::exit(1);
                }
            };

            server::start_server(store, config).await;
        }
        Commands::ValidateEnv => match validate_environment() {
            Ok(config) => {
                println!("Environment OK");
                println!("  bind address: {}", config.bind_address);
                println!("  data file:    {}", config.data_file);
                println!(
                    "  rate limit:   {} requests / {}s window",
                    config.rate_limit_max_requests, config.rate_limit_window_secs
                );
                println!("  log level:    {}", config.log_level);
            }
            Err(errors) => {
                for error in errors {
                    eprintln!("Environment validation error: {}", error);
                }
                std::process::exit(1);
            }
        },
    }
}
