//! Fail-closed extraction facade.
//!
//! Every failure mode below this point (network, quota, malformed output,
//! schema violations) collapses into one of two deterministic fallbacks:
//! the empty data-entry portal for documents, the inert rule for rules.
//! Callers never see an error from this layer.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use crate::models::{BusinessRule, DocumentContext, GenericItem};

use super::client::{GenerativeClient, InlineMedia, Part};
use super::parser::{parse_document_response, parse_rule_response};
use super::prompt::{document_schema, rule_schema, DOCUMENT_PROMPT, RULE_PROMPT};
use super::ExtractionError;

/// Validated result of one document analysis.
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    pub context: DocumentContext,
    pub items: Vec<GenericItem>,
}

impl DocumentExtraction {
    /// The fallback application: an empty form portal. Always renderable.
    pub fn fallback() -> Self {
        Self {
            context: DocumentContext::fallback(),
            items: Vec::new(),
        }
    }
}

/// Source material for rule extraction.
pub enum RuleInput {
    Text(String),
    Audio(InlineMedia),
}

/// High-level extraction API over any [`GenerativeClient`].
pub struct ExtractionService {
    client: Arc<dyn GenerativeClient>,
}

impl ExtractionService {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    /// Analyze document photographs into a context plus item set.
    ///
    /// Infallible by contract: failures degrade to
    /// [`DocumentExtraction::fallback`] with a logged warning.
    pub async fn extract_document(&self, images: &[InlineMedia]) -> DocumentExtraction {
        let span = info_span!("extract_document", image_count = images.len());
        match self.try_extract_document(images).instrument(span).await {
            Ok(extraction) => {
                info!(
                    detected_type = %extraction.context.detected_type,
                    layout = %extraction.context.layout,
                    item_count = extraction.items.len(),
                    "document extraction complete"
                );
                extraction
            }
            Err(e) => {
                warn!(error = %e, "document extraction failed, serving fallback portal");
                DocumentExtraction::fallback()
            }
        }
    }

    async fn try_extract_document(
        &self,
        images: &[InlineMedia],
    ) -> Result<DocumentExtraction, ExtractionError> {
        if images.is_empty() {
            return Err(ExtractionError::InvalidPayload(
                "no images supplied".to_string(),
            ));
        }

        let mut parts: Vec<Part> = images.iter().cloned().map(Part::media).collect();
        parts.push(Part::text(DOCUMENT_PROMPT));

        let raw = self.client.generate_json(&parts, &document_schema()).await?;
        parse_document_response(&raw)
    }

    /// Turn a spoken or written instruction into a threshold rule.
    ///
    /// Infallible by contract: failures degrade to [`BusinessRule::inert`].
    pub async fn extract_rule(&self, input: RuleInput) -> BusinessRule {
        let source = match &input {
            RuleInput::Text(_) => "text",
            RuleInput::Audio(_) => "audio",
        };
        let span = info_span!("extract_rule", source);
        match self.try_extract_rule(input).instrument(span).await {
            Ok(rule) => {
                info!(kind = ?rule.kind, threshold = rule.threshold, "rule extraction complete");
                rule
            }
            Err(e) => {
                warn!(error = %e, "rule extraction failed, serving inert rule");
                BusinessRule::inert()
            }
        }
    }

    async fn try_extract_rule(&self, input: RuleInput) -> Result<BusinessRule, ExtractionError> {
        let parts = match input {
            RuleInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(ExtractionError::InvalidPayload(
                        "empty rule text".to_string(),
                    ));
                }
                vec![Part::text(RULE_PROMPT), Part::text(text)]
            }
            RuleInput::Audio(media) => vec![Part::text(RULE_PROMPT), Part::media(media)],
        };

        let raw = self.client.generate_json(&parts, &rule_schema()).await?;
        parse_rule_response(&raw)
    }
}
