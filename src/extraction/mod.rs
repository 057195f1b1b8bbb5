//! Document and rule extraction via a hosted multimodal model.
//!
//! Flow: images (and optionally a rule instruction) go in as inline
//! base64 parts, the model answers under a strict JSON schema, the parser
//! validates the answer, and the service converts any failure into a
//! deterministic fallback. The rest of the crate never handles a model
//! error directly.

pub mod client;
pub mod parser;
pub mod prompt;
pub mod service;

use thiserror::Error;

pub use client::{GeminiClient, GenerativeClient, InlineMedia, MockGenerativeClient, Part};
pub use service::{DocumentExtraction, ExtractionService, RuleInput};

/// Failures on the path from request to validated extraction.
///
/// These never escape [`ExtractionService`]; they exist so logs can name
/// exactly what went wrong before the fallback is served.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no API key configured for the extraction service")]
    MissingApiKey,

    #[error("extraction service unreachable: {0}")]
    Transport(String),

    #[error("extraction service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("empty response from extraction service")]
    EmptyResponse,

    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),

    #[error("invalid extraction payload: {0}")]
    InvalidPayload(String),
}
