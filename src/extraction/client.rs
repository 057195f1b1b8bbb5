//! Multimodal model client.
//!
//! `GenerativeClient` is the seam between the pipeline and the hosted
//! model: one call in, one JSON document out. The production impl talks
//! to the Gemini `generateContent` endpoint; tests swap in a mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ExtractionError;

/// One part of a multimodal request: instruction text or inline media.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        inline_data: InlineMedia,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn media(media: InlineMedia) -> Self {
        Part::InlineData { inline_data: media }
    }
}

/// Base64-encoded media payload with its MIME type.
#[derive(Debug, Clone, Serialize)]
pub struct InlineMedia {
    pub mime_type: String,
    pub data: String,
}

/// Client capable of structured JSON generation from multimodal parts.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Submit `parts` with a response schema and return the raw JSON text
    /// the model produced. Single attempt, no retries; callers fail closed.
    async fn generate_json(&self, parts: &[Part], schema: &Value)
        -> Result<String, ExtractionError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Gemini client
// ═══════════════════════════════════════════════════════════════════════

/// Hosted Gemini client over the v1beta REST surface.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
        model: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: &'a [Part],
}

#[derive(Serialize)]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_json(
        &self,
        parts: &[Part],
        schema: &Value,
    ) -> Result<String, ExtractionError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ExtractionError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Transport("request timed out".to_string())
                } else {
                    ExtractionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyResponse);
        }
        Ok(text)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Mock client for tests
// ═══════════════════════════════════════════════════════════════════════

/// Mock generative client — replays a scripted sequence of responses.
pub struct MockGenerativeClient {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<String, String>>>,
}

impl MockGenerativeClient {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(std::collections::VecDeque::new()),
        }
    }

    /// Queue a successful response.
    pub fn respond(self, body: &str) -> Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(body.to_string()));
        }
        self
    }

    /// Queue a transport failure.
    pub fn fail(self, message: &str) -> Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(message.to_string()));
        }
        self
    }
}

impl Default for MockGenerativeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeClient for MockGenerativeClient {
    async fn generate_json(
        &self,
        _parts: &[Part],
        _schema: &Value,
    ) -> Result<String, ExtractionError> {
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        match next {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(ExtractionError::Transport(message)),
            None => Err(ExtractionError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_replays_responses_in_order() {
        let client = MockGenerativeClient::new()
            .respond("first")
            .respond("second");
        let schema = serde_json::json!({});
        assert_eq!(client.generate_json(&[], &schema).await.unwrap(), "first");
        assert_eq!(client.generate_json(&[], &schema).await.unwrap(), "second");
        assert!(client.generate_json(&[], &schema).await.is_err());
    }

    #[tokio::test]
    async fn mock_scripted_failure() {
        let client = MockGenerativeClient::new().fail("connection refused");
        let err = client
            .generate_json(&[], &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Transport(_)));
    }

    #[tokio::test]
    async fn gemini_without_key_fails_fast() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "https://generativelanguage.googleapis.com/",
            None,
            "gemini-2.5-flash",
        );
        let err = client
            .generate_json(&[Part::text("hello")], &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::MissingApiKey));
    }

    #[test]
    fn gemini_trims_trailing_slash() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "https://example.test/",
            Some("k".into()),
            "m",
        );
        assert_eq!(client.base_url, "https://example.test");
    }

    #[test]
    fn parts_serialize_to_gemini_wire_shape() {
        let parts = vec![
            Part::media(InlineMedia {
                mime_type: "image/jpeg".into(),
                data: "aGVsbG8=".into(),
            }),
            Part::text("extract"),
        ];
        let json = serde_json::to_value(&parts).unwrap();
        assert_eq!(json[0]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(json[1]["text"], "extract");
    }
}
