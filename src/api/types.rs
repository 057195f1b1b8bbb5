//! Shared types for the HTTP API layer: context, request payloads, and
//! the session snapshot every endpoint answers with.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{DerivedMetrics, LayoutState, RuleStatus, Session, SessionStore};
use crate::extraction::{ExtractionService, InlineMedia};
use crate::models::{BusinessRule, DocumentContext, GenericItem};

use super::error::ApiError;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<Mutex<SessionStore>>,
    pub extraction: Arc<ExtractionService>,
}

impl ApiContext {
    pub fn new(extraction: Arc<ExtractionService>) -> Self {
        Self {
            store: Arc::new(Mutex::new(SessionStore::new())),
            extraction,
        }
    }

    pub fn lock_store(&self) -> Result<MutexGuard<'_, SessionStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("session store lock poisoned".into()))
    }
}

// ═══════════════════════════════════════════════════════════
// Request payloads
// ═══════════════════════════════════════════════════════════

/// Base64 media from the browser, either a `data:` URL or a raw base64
/// string with an explicit MIME type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPayload {
    pub data: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl MediaPayload {
    /// Validate and normalize into an inline part for the model request.
    pub fn into_inline_media(self, default_mime: &str) -> Result<InlineMedia, ApiError> {
        let (mime_type, data) = match self.data.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(";base64,").ok_or_else(|| {
                    ApiError::BadRequest("data URL must be base64 encoded".into())
                })?;
                let mime = if header.is_empty() {
                    default_mime.to_string()
                } else {
                    header.to_string()
                };
                (mime, payload.to_string())
            }
            None => (
                self.mime_type
                    .unwrap_or_else(|| default_mime.to_string()),
                self.data,
            ),
        };

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(data.as_bytes())
            .map_err(|e| ApiError::BadRequest(format!("invalid base64 payload: {e}")))?;

        Ok(InlineMedia { mime_type, data })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub images: Vec<MediaPayload>,
    #[serde(default)]
    pub rule_text: Option<String>,
    #[serde(default)]
    pub rule_audio: Option<MediaPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFieldRequest {
    pub item_id: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOp {
    Increment,
    Decrement,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    pub item_id: String,
    pub op: CartOp,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub item_id: String,
}

// ═══════════════════════════════════════════════════════════
// Session snapshot — the read model every endpoint returns
// ═══════════════════════════════════════════════════════════

/// Items sharing one category, in the order they appeared on the document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<GenericItem>,
}

/// Layout state as the client sees it, tagged by layout.
#[derive(Debug, Serialize)]
#[serde(tag = "layout", rename_all = "camelCase")]
pub enum StateView {
    Form { values: HashMap<String, String> },
    Catalog { quantities: HashMap<String, u32> },
    Checklist { checked: HashMap<String, bool> },
}

/// Complete view of one session: everything a stateless client needs to
/// render the generated application after any operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: &'static str,
    pub context: DocumentContext,
    pub submit_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<BusinessRule>,
    pub groups: Vec<CategoryGroup>,
    pub state: StateView,
    pub metrics: DerivedMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_status: Option<RuleStatus>,
}

impl SessionSnapshot {
    pub fn from_session(session_id: Uuid, session: &Session) -> Self {
        let state = match &session.state {
            LayoutState::Form { values } => StateView::Form {
                values: values.clone(),
            },
            LayoutState::Catalog { quantities } => StateView::Catalog {
                quantities: quantities.clone(),
            },
            LayoutState::Checklist { checked } => StateView::Checklist {
                checked: checked.clone(),
            },
        };

        let groups = session
            .grouped()
            .into_iter()
            .map(|(category, items)| CategoryGroup {
                category,
                items: items.into_iter().cloned().collect(),
            })
            .collect();

        Self {
            session_id,
            phase: session.phase.as_str(),
            submit_label: session.context.layout.submit_label(),
            context: session.context.clone(),
            rule: session.rule.clone(),
            groups,
            state,
            metrics: session.metrics(),
            rule_status: session.rule_status(),
        }
    }
}
