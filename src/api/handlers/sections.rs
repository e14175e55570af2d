//! Handlers shared by every whole-document section.
//!
//! Routes instantiate them per type, e.g. `get(get_section::<Profile>)`.

use crate::{
    api::extract::AppJson,
    auth::middleware::AuthAdmin,
    types::{ApiResponse, AppError, Result, SectionDocument},
    AppState,
};
use axum::{extract::State, Json};
use serde_json::Value;

pub async fn get_section<S: SectionDocument>(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<S>>> {
    let section = state
        .store
        .get_section::<S>()
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", S::LABEL)))?;

    Ok(Json(ApiResponse::ok(section)))
}

/// Replaces the stored document with the request body.
pub async fn put_section<S: SectionDocument>(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    AppJson(body): AppJson<Value>,
) -> Result<Json<ApiResponse<()>>> {
    if !body.is_object() {
        return Err(AppError::InvalidInput(format!(
            "{} must be a JSON object",
            S::LABEL
        )));
    }

    let section: S = serde_json::from_value(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid {}: {}", S::KEY, e)))?;
    section.validate()?;

    state.store.put_section(&section).await?;
    tracing::info!(admin = %claims.sub, section = S::KEY, "section updated");

    Ok(Json(ApiResponse::done(format!(
        "{} updated successfully",
        S::LABEL
    ))))
}
