pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ConversionRequest, ConverterService, RateCache};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        request: ConversionRequest,
        json: bool,
    },
    Rates {
        refresh: bool,
    },
    Popular,
    Currencies,
    Batch {
        input: Option<PathBuf>,
    },
}

/// Builds the service, and the cache it owns, for one application run.
pub fn build_service(config: &AppConfig, offline: bool) -> Result<ConverterService> {
    let provider = providers::from_config(&config.providers, offline)?;
    info!(provider = provider.name(), "Rate provider ready");

    let cache = RateCache::new(provider)
        .with_ttl(config.cache.ttl())
        .with_fetch_timeout(config.cache.fetch_timeout());
    Ok(ConverterService::new(Arc::new(cache)))
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    offline: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = build_service(&config, offline)?;

    match command {
        AppCommand::Convert { request, json } => cli::convert::run(&service, &request, json).await,
        AppCommand::Rates { refresh } => cli::rates::run_latest(&service, refresh).await,
        AppCommand::Popular => cli::rates::run_popular(&service).await,
        AppCommand::Currencies => cli::rates::run_currencies(),
        AppCommand::Batch { input } => cli::batch::run(&service, input.as_deref()).await,
    }
}
