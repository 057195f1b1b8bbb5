//! Business rule — a single threshold trigger parsed from natural language.

use serde::{Deserialize, Serialize};

/// Threshold used by the inert fallback rule. High enough that ordinary
/// document totals never cross it, so the fallback never fires visibly.
pub const INERT_THRESHOLD: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Crossing the threshold requires a named action (approval, escalation).
    ThresholdAction,
    /// Crossing the threshold applies a percentage benefit.
    ThresholdDiscount,
}

/// One monitored condition over the session's tracked value.
///
/// A rule never changes stored state; it only produces a triggered flag
/// and a display message on evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub threshold: f64,
    /// Percentage benefit; meaningful only for `ThresholdDiscount`.
    #[serde(default)]
    pub benefit_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    /// The instruction as the user gave it, for display.
    pub original_text: String,
}

impl BusinessRule {
    /// Fallback rule served when rule extraction fails. Structurally valid
    /// so the evaluation path never branches on extraction health.
    pub fn inert() -> Self {
        Self {
            kind: RuleKind::ThresholdAction,
            threshold: INERT_THRESHOLD,
            benefit_value: 0.0,
            action_name: None,
            original_text: "No specific rule detected.".to_string(),
        }
    }
}
