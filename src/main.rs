use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use docuform::api::{build_router, ApiContext};
use docuform::config::{ServerConfig, APP_NAME, APP_VERSION};
use docuform::extraction::{ExtractionService, GeminiClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    info!(name = APP_NAME, version = APP_VERSION, addr = %config.bind_addr, "starting");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.gemini.timeout_secs))
        .build()?;
    let client = GeminiClient::new(
        http,
        &config.gemini.base_url,
        config.gemini.api_key.clone(),
        &config.gemini.model,
    );
    let extraction = Arc::new(ExtractionService::new(Arc::new(client)));

    let router = build_router(ApiContext::new(extraction));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
