//! Generic extracted item — one form field, catalog entity, or checklist task.

use serde::{Deserialize, Deserializer, Serialize};

/// UI hint for how a field should be rendered. Carries no engine semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Textarea,
    Currency,
    Boolean,
}

/// One extracted data point: a form field label+value, a priced catalog
/// entity, or a checklist task.
///
/// Invariants (enforced by the extraction parser):
/// - `id` is unique within an extracted set and stable for the session
/// - `name` is non-empty
/// - `category` is the grouping key; grouping substitutes "General" when empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericItem {
    pub id: String,
    pub name: String,
    /// Default value, OCR content, or the numeric price for catalog items.
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
}

impl GenericItem {
    /// Price of a catalog item. Unparseable or negative values are
    /// treated as price 0 so the cart total is always renderable.
    pub fn price(&self) -> f64 {
        parse_numeric(&self.value)
            .filter(|v| *v >= 0.0)
            .unwrap_or(0.0)
    }
}

/// Default grouping key for items whose category is empty.
pub const DEFAULT_CATEGORY: &str = "General";

/// Lenient numeric parse for live totals.
///
/// Mirrors the permissive prefix semantics of the browser runtime the
/// document UIs target: leading whitespace and a single currency sign are
/// skipped, then the longest numeric prefix is taken ("6000 units" → 6000).
/// Returns `None` when no digits are found; totals treat that as 0.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim().trim_start_matches('$').trim_start();
    if trimmed.is_empty() {
        return None;
    }

    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                end = i + 1;
            }
            '-' | '+' if i == 0 => end = i + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end].parse().ok()
}

/// Accept both `"12.50"` and `12.5` on the wire — models occasionally emit
/// raw numbers for price fields despite the declared string schema.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for item value, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(value: &str) -> GenericItem {
        GenericItem {
            id: "p1".into(),
            name: "Widget".into(),
            value: value.into(),
            category: "Shop".into(),
            description: None,
            kind: None,
        }
    }

    #[test]
    fn parse_numeric_plain_values() {
        assert_eq!(parse_numeric("10"), Some(10.0));
        assert_eq!(parse_numeric("4.50"), Some(4.5));
        assert_eq!(parse_numeric("-3"), Some(-3.0));
        assert_eq!(parse_numeric(".5"), Some(0.5));
    }

    #[test]
    fn parse_numeric_takes_leading_prefix() {
        assert_eq!(parse_numeric("6000 units"), Some(6000.0));
        assert_eq!(parse_numeric("12.5kg"), Some(12.5));
        assert_eq!(parse_numeric("10.5.3"), Some(10.5));
    }

    #[test]
    fn parse_numeric_strips_currency_sign() {
        assert_eq!(parse_numeric("$4.50"), Some(4.5));
        assert_eq!(parse_numeric("  $1200"), Some(1200.0));
    }

    #[test]
    fn parse_numeric_rejects_non_numeric() {
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("free"), None);
        assert_eq!(parse_numeric("$"), None);
        assert_eq!(parse_numeric("-"), None);
    }

    #[test]
    fn price_defaults_to_zero() {
        assert_eq!(item("market price").price(), 0.0);
        assert_eq!(item("").price(), 0.0);
    }

    #[test]
    fn negative_price_clamped_to_zero() {
        assert_eq!(item("-5").price(), 0.0);
    }

    #[test]
    fn valid_price_parses() {
        assert_eq!(item("10").price(), 10.0);
        assert_eq!(item("$4.25").price(), 4.25);
    }

    #[test]
    fn deserializes_numeric_value() {
        let json = r#"{"id":"a","name":"Amount","value":12.5,"category":"General"}"#;
        let parsed: GenericItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.value, "12.5");
    }

    #[test]
    fn deserializes_missing_value_as_empty() {
        let json = r#"{"id":"a","name":"Amount","category":"General"}"#;
        let parsed: GenericItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.value, "");
    }

    #[test]
    fn field_kind_wire_names_are_lowercase() {
        let json = r#"{"id":"a","name":"Notes","category":"General","type":"textarea"}"#;
        let parsed: GenericItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.kind, Some(FieldKind::Textarea));
    }
}
