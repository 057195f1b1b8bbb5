//! Response parsing and validation for model output.
//!
//! The response schema keeps the model honest most of the time, but not
//! always: fenced output, numeric strings, missing ids and invented layout
//! names all occur in the wild. Everything here is strict — any violation
//! becomes a parse error so the service can fail closed to its fallback.

use serde::Deserialize;

use crate::models::{BusinessRule, DocumentContext, GenericItem, LayoutType, RuleKind};

use super::service::DocumentExtraction;
use super::ExtractionError;

/// Locate the outermost JSON object in raw model output, tolerating
/// markdown fences and stray prose around it.
pub fn extract_json_object(raw: &str) -> Result<&str, ExtractionError> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if e > s => Ok(&raw[s..=e]),
        _ => Err(ExtractionError::MalformedResponse(
            "no JSON object found in model output".to_string(),
        )),
    }
}

// ── Document response ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawDocumentResponse {
    context: RawContext,
    items: Vec<GenericItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContext {
    detected_type: String,
    app_title: String,
    action_button_label: String,
    summary_label: String,
    layout_type: String,
}

/// Parse and validate a document-analysis response.
///
/// Validation is all-or-nothing: a single bad item fails the whole
/// response rather than serving a partially trustworthy application.
pub fn parse_document_response(raw: &str) -> Result<DocumentExtraction, ExtractionError> {
    let body = extract_json_object(raw)?;
    let parsed: RawDocumentResponse = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let layout = LayoutType::from_wire(&parsed.context.layout_type).ok_or_else(|| {
        ExtractionError::InvalidPayload(format!(
            "unknown layoutType '{}'",
            parsed.context.layout_type
        ))
    })?;

    for required in [
        (&parsed.context.detected_type, "detectedType"),
        (&parsed.context.app_title, "appTitle"),
        (&parsed.context.action_button_label, "actionButtonLabel"),
        (&parsed.context.summary_label, "summaryLabel"),
    ] {
        if required.0.trim().is_empty() {
            return Err(ExtractionError::InvalidPayload(format!(
                "context field '{}' is empty",
                required.1
            )));
        }
    }

    let mut seen_ids = std::collections::HashSet::new();
    for item in &parsed.items {
        if item.id.trim().is_empty()
            || item.name.trim().is_empty()
            || item.category.trim().is_empty()
        {
            return Err(ExtractionError::InvalidPayload(format!(
                "item with empty id, name or category (id='{}')",
                item.id
            )));
        }
        if !seen_ids.insert(item.id.as_str()) {
            return Err(ExtractionError::InvalidPayload(format!(
                "duplicate item id '{}'",
                item.id
            )));
        }
    }

    Ok(DocumentExtraction {
        context: DocumentContext {
            detected_type: parsed.context.detected_type,
            app_title: parsed.context.app_title,
            action_button_label: parsed.context.action_button_label,
            summary_label: parsed.context.summary_label,
            layout,
        },
        items: parsed.items,
    })
}

// ── Rule response ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    #[serde(rename = "type")]
    kind: String,
    threshold: Option<f64>,
    benefit_value: Option<f64>,
    action_name: Option<String>,
    original_text: Option<String>,
}

/// Parse and validate a rule-extraction response.
pub fn parse_rule_response(raw: &str) -> Result<BusinessRule, ExtractionError> {
    let body = extract_json_object(raw)?;
    let parsed: RawRule = serde_json::from_str(body)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let kind = match parsed.kind.as_str() {
        "threshold_action" => RuleKind::ThresholdAction,
        "threshold_discount" => RuleKind::ThresholdDiscount,
        other => {
            return Err(ExtractionError::InvalidPayload(format!(
                "unknown rule type '{other}'"
            )))
        }
    };

    let threshold = parsed
        .threshold
        .filter(|t| t.is_finite())
        .ok_or_else(|| {
            ExtractionError::InvalidPayload("rule threshold missing or not finite".to_string())
        })?;

    let benefit_value = match kind {
        RuleKind::ThresholdDiscount => parsed.benefit_value.filter(|b| b.is_finite()).ok_or_else(
            || ExtractionError::InvalidPayload("discount rule without benefitValue".to_string()),
        )?,
        RuleKind::ThresholdAction => parsed.benefit_value.unwrap_or(0.0),
    };

    let original_text = parsed
        .original_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            ExtractionError::InvalidPayload("rule originalText missing".to_string())
        })?;

    Ok(BusinessRule {
        kind,
        threshold,
        benefit_value,
        action_name: parsed.action_name.filter(|a| !a.trim().is_empty()),
        original_text,
    })
}
