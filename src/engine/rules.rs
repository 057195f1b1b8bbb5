//! Business rule evaluation.
//!
//! A rule is evaluated against the session's tracked value on every
//! snapshot. Evaluation is read-only and total: every (rule, value) pair
//! produces a status, triggered or not.

use serde::Serialize;

use crate::models::{BusinessRule, RuleKind};

/// Outcome of evaluating one rule against the current tracked value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleStatus {
    pub triggered: bool,
    pub message: String,
    pub tracked_value: f64,
    pub threshold: f64,
}

/// Evaluate `rule` against `tracked`. The threshold is inclusive.
pub fn evaluate(rule: &BusinessRule, tracked: f64) -> RuleStatus {
    let triggered = tracked >= rule.threshold;
    let message = if triggered {
        match rule.kind {
            RuleKind::ThresholdDiscount => {
                format!("Benefit Applied: {}%", format_amount(rule.benefit_value))
            }
            RuleKind::ThresholdAction => rule
                .action_name
                .clone()
                .unwrap_or_else(|| "Approval Required".to_string()),
        }
    } else {
        format!(
            "Value: {} / Threshold: {}",
            format_amount(tracked),
            format_amount(rule.threshold)
        )
    };

    RuleStatus {
        triggered,
        message,
        tracked_value: tracked,
        threshold: rule.threshold,
    }
}

/// Render an amount without a trailing `.0` for whole numbers, matching
/// how the numbers read in the instruction they came from.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
