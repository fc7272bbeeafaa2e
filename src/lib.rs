pub mod analysis; // AI recommendation via chat completions
pub mod api; // HTTP API
pub mod auth;
pub mod config;
pub mod db;
pub mod intake; // Submission validation + persistence
pub mod models;
pub mod report; // PDF and plain-text reports

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::analysis::{AnalysisError, CompletionClient, MockCompletionClient, OpenAiClient};
use crate::api::ApiContext;
use crate::config::{AppConfig, ConfigError};
use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Completion client error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mock client in test mode, OpenAI otherwise.
///
/// Must be called outside the async runtime: the blocking HTTP client
/// owns its own runtime.
pub fn completion_client(config: &AppConfig) -> Result<Arc<dyn CompletionClient>, AnalysisError> {
    if config.test_mode {
        tracing::info!("Test mode: using canned completions");
        return Ok(Arc::new(MockCompletionClient::canned()));
    }
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or(AnalysisError::MissingApiKey)?;
    let client = OpenAiClient::new(
        &config.openai_base_url,
        api_key,
        &config.openai_model,
        config.openai_timeout_secs,
    )?;
    tracing::info!(model = client.model(), "Completion client ready");
    Ok(Arc::new(client))
}

pub fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    // Create the schema up front so a bad data dir fails at startup.
    db::open_database(&config.db_path())?;
    tracing::info!(data_dir = %config.data_dir.display(), "Database ready");

    let completion = completion_client(&config)?;
    let bind_addr = config.bind_addr;
    let ctx = ApiContext::new(config, Arc::clone(&completion));

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(api::serve(ctx, bind_addr, api::server::ctrl_c_signal()));
    drop(runtime);
    // Last client reference is released here, outside the runtime.
    drop(completion);

    result.map_err(StartupError::from)
}
