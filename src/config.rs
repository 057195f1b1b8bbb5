//! Application constants and environment-driven configuration.

use std::net::SocketAddr;

pub const APP_NAME: &str = "Docuform";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub gemini: GeminiConfig,
}

/// Connection settings for the hosted extraction model.
///
/// A missing API key is not a startup error: the server still runs and
/// every extraction fails closed to the fallback portal.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load from environment variables, falling back to defaults for
    /// everything except the API key.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("DOCUFORM_BIND_ADDR")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| {
                DEFAULT_BIND_ADDR
                    .parse()
                    .unwrap_or(SocketAddr::from(([127, 0, 0, 1], 8787)))
            });

        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(
                "GEMINI_API_KEY not set, extraction will serve fallback results only"
            );
        }

        Self {
            bind_addr,
            gemini: GeminiConfig {
                base_url: std::env::var("GEMINI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
                api_key,
                model: std::env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
                timeout_secs: std::env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        }
    }
}
