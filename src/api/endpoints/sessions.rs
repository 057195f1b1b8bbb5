//! Session endpoints: snapshot reads and state mutations.
//!
//! Every mutation answers with the refreshed snapshot so the client never
//! has to derive state locally.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{
    ApiContext, CartOp, CartRequest, SessionSnapshot, SetFieldRequest, ToggleRequest,
};
use crate::engine::Session;

fn snapshot(id: Uuid, session: &Session) -> Json<SessionSnapshot> {
    Json(SessionSnapshot::from_session(id, session))
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("session {id} not found"))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let store = ctx.lock_store()?;
    let session = store.get(&id).ok_or_else(|| not_found(id))?;
    Ok(snapshot(id, session))
}

/// POST /api/sessions/{id}/field
pub async fn set_field(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetFieldRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut store = ctx.lock_store()?;
    let session = store.get_mut(&id).ok_or_else(|| not_found(id))?;
    session.set_field(&request.item_id, request.value)?;
    Ok(snapshot(id, session))
}

/// POST /api/sessions/{id}/cart
pub async fn cart(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<CartRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut store = ctx.lock_store()?;
    let session = store.get_mut(&id).ok_or_else(|| not_found(id))?;
    match request.op {
        CartOp::Increment => session.cart_increment(&request.item_id)?,
        CartOp::Decrement => session.cart_decrement(&request.item_id)?,
    }
    Ok(snapshot(id, session))
}

/// POST /api/sessions/{id}/toggle
pub async fn toggle(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut store = ctx.lock_store()?;
    let session = store.get_mut(&id).ok_or_else(|| not_found(id))?;
    session.toggle(&request.item_id)?;
    Ok(snapshot(id, session))
}

/// POST /api/sessions/{id}/submit
pub async fn submit(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut store = ctx.lock_store()?;
    let session = store.get_mut(&id).ok_or_else(|| not_found(id))?;
    session.submit()?;
    info!(session_id = %id, "session submitted");
    Ok(snapshot(id, session))
}

/// POST /api/sessions/{id}/reset
pub async fn reset(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut store = ctx.lock_store()?;
    if !store.reset(&id) {
        return Err(not_found(id));
    }
    info!(session_id = %id, "session reset");
    Ok(StatusCode::NO_CONTENT)
}
