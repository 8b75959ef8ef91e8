//! Object store smoke test
//!
//! Loads settings from the environment (and `.env`), then uploads
//! `test.jpg`, downloads it to `received_file.jpg` and deletes it.

use anyhow::{Context, Result};
use s3_object_store::s3::ObjectStoreClient;
use s3_object_store::settings::StoreSettings;
use s3_object_store::smoke;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting s3-object-store v{}", env!("CARGO_PKG_VERSION"));

    let settings = StoreSettings::from_env().context("Failed to load store settings")?;
    let client = ObjectStoreClient::new(settings)
        .await
        .context("Failed to create store client")?;

    let report = smoke::run_default(&client).await;

    if report.is_success() {
        tracing::info!("All {} steps succeeded", report.steps.len());
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(
            "{} of {} steps failed",
            report.failures().count(),
            report.steps.len()
        );
        Ok(ExitCode::FAILURE)
    }
}
