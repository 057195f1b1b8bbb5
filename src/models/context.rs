//! Document context — what the document is and how its application renders.

use serde::{Deserialize, Serialize};

/// Interaction model chosen once per analysis cycle.
///
/// `Form` is the universal fallback: any unknown or missing wire value
/// degrades to a plain data-entry form rather than failing the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Form,
    Catalog,
    Checklist,
}

impl LayoutType {
    /// Strict parse of a wire literal. `None` for anything outside the
    /// three known layouts; callers decide whether that is a validation
    /// failure (extraction parser) or a fallback to `Form` (defensive).
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "form" => Some(LayoutType::Form),
            "catalog" => Some(LayoutType::Catalog),
            "checklist" => Some(LayoutType::Checklist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Form => "form",
            LayoutType::Catalog => "catalog",
            LayoutType::Checklist => "checklist",
        }
    }

    /// Submission label shown while a submit is in flight.
    pub fn submit_label(&self) -> &'static str {
        match self {
            LayoutType::Catalog => "Place Order",
            LayoutType::Checklist => "Finalize Audit",
            LayoutType::Form => "Process Data",
        }
    }
}

impl std::fmt::Display for LayoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification metadata for one analyzed document. Drives the app
/// title, button labels, and layout selection on the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContext {
    /// Human-readable document class, e.g. "Invoice" or "Safety Checklist".
    pub detected_type: String,
    pub app_title: String,
    pub action_button_label: String,
    /// Label for the summary panel ("Items", "Fields", "Tasks").
    pub summary_label: String,
    #[serde(rename = "layoutType")]
    pub layout: LayoutType,
}

impl DocumentContext {
    /// Deterministic context served when extraction fails for any reason.
    /// Paired with an empty item list this renders an empty but working
    /// data-entry portal.
    pub fn fallback() -> Self {
        Self {
            detected_type: "Unknown".to_string(),
            app_title: "Data Entry Portal".to_string(),
            action_button_label: "Submit Data".to_string(),
            summary_label: "Fields".to_string(),
            layout: LayoutType::Form,
        }
    }
}
