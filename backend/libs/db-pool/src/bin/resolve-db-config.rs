//! Startup check: resolve the database configuration from the environment
//! and report it, optionally opening and probing the pool.
//!
//! Usage:
//!   resolve-db-config            resolve and log only
//!   resolve-db-config --verify   also connect and run the validation query

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let verify = match env::args().nth(1).as_deref() {
        None => false,
        Some("--verify") => true,
        Some(other) => {
            eprintln!("Unknown argument: {}", other);
            eprintln!("Usage: resolve-db-config [--verify]");
            return ExitCode::from(2);
        }
    };

    match run(verify).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "Startup check failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(verify: bool) -> anyhow::Result<()> {
    // Failure has already been narrated by the reporter
    let resolution = db_pool::resolve_and_report_from_env()?;

    if verify {
        db_pool::create_pool(&resolution)
            .await
            .context("Failed to create database pool")?
            .close()
            .await;
    }

    Ok(())
}
