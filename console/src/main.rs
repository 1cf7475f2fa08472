//! Ferrand Console - interactive front-end for the key/value list engine.
//!
//! Reads `name=value` entries and list commands from standard input and prints
//! the list after every change. Logs go to standard error.

mod commands;
mod config;
mod error;
mod handlers;
mod render;

use crate::config::Config;
use crate::handlers::Session;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferrand_console=info,ferrand_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!(
        sort = %config.default_sort,
        "Starting Ferrand console v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut session = Session::new(config);
    session.run(io::stdin().lock(), io::stdout().lock())?;

    tracing::info!(entries = session.store().len(), "Session ended");
    Ok(())
}
