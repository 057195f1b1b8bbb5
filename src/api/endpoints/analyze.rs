//! POST /api/analyze — run one full analysis cycle.
//!
//! Order matters here: the generation is taken before the model calls so
//! a reset or newer analysis issued mid-flight supersedes this one, and
//! the store lock is never held across an await.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeRequest, ApiContext, SessionSnapshot};
use crate::extraction::RuleInput;

pub async fn analyze(
    State(ctx): State<ApiContext>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ApiError> {
    if request.images.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one document image is required".into(),
        ));
    }

    let mut images = Vec::with_capacity(request.images.len());
    for payload in request.images {
        images.push(payload.into_inline_media("image/jpeg")?);
    }

    let rule_input = match request.rule_audio {
        Some(audio) => Some(RuleInput::Audio(audio.into_inline_media("audio/webm")?)),
        None => request
            .rule_text
            .filter(|text| !text.trim().is_empty())
            .map(RuleInput::Text),
    };

    let generation = ctx.lock_store()?.begin_cycle();

    let rule = match rule_input {
        Some(input) => Some(ctx.extraction.extract_rule(input).await),
        None => None,
    };
    let document = ctx.extraction.extract_document(&images).await;

    let mut store = ctx.lock_store()?;
    let session_id = store
        .install(generation, document.context, document.items, rule)
        .ok_or(ApiError::Superseded)?;
    let session = store
        .get(&session_id)
        .ok_or_else(|| ApiError::Internal("freshly installed session missing".into()))?;

    info!(%session_id, layout = %session.context.layout, "analysis cycle installed");
    Ok((
        StatusCode::CREATED,
        Json(SessionSnapshot::from_session(session_id, session)),
    ))
}
