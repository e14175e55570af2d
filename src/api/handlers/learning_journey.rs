use crate::{
    api::extract::AppJson,
    auth::middleware::AuthAdmin,
    types::{ApiResponse, AppError, LearningPhase, LearningPhaseDraft, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// Phases sorted by `order`
pub async fn list_phases(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LearningPhase>>>> {
    Ok(Json(ApiResponse::list(
        state.store.list_learning_phases().await?,
    )))
}

pub async fn create_phase(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    AppJson(draft): AppJson<LearningPhaseDraft>,
) -> Result<Json<ApiResponse<LearningPhase>>> {
    draft.validate()?;

    let phase = state.store.create_learning_phase(draft).await?;
    tracing::info!(admin = %claims.sub, id = %phase.id, "learning phase created");

    let id = phase.id.clone();
    Ok(Json(
        ApiResponse::ok(phase)
            .with_message("Learning phase created successfully")
            .with_id(id),
    ))
}

pub async fn update_phase(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    Path(id): Path<String>,
    AppJson(draft): AppJson<LearningPhaseDraft>,
) -> Result<Json<ApiResponse<LearningPhase>>> {
    draft.validate()?;

    let phase = state
        .store
        .update_learning_phase(&id, draft)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Learning phase '{}' not found", id)))?;
    tracing::info!(admin = %claims.sub, %id, "learning phase updated");

    Ok(Json(
        ApiResponse::ok(phase).with_message("Learning phase updated successfully"),
    ))
}

pub async fn delete_phase(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.store.delete_learning_phase(&id).await? {
        return Err(AppError::NotFound(format!(
            "Learning phase '{}' not found",
            id
        )));
    }
    tracing::info!(admin = %claims.sub, %id, "learning phase deleted");

    Ok(Json(ApiResponse::done("Learning phase deleted successfully")))
}
