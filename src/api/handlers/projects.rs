use crate::{
    api::extract::AppJson,
    auth::middleware::AuthAdmin,
    types::{ApiResponse, AppError, FieldError, Project, ProjectDraft, ProjectUpdate, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Project '{}' not found", id))
}

/// All projects, newest first
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Project>>>> {
    Ok(Json(ApiResponse::list(state.store.list_projects().await?)))
}

pub async fn create_project(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    AppJson(draft): AppJson<ProjectDraft>,
) -> Result<Json<ApiResponse<Project>>> {
    draft.validate()?;

    let project = state.store.create_project(draft).await?;
    tracing::info!(admin = %claims.sub, id = %project.id, "project created");

    let id = project.id.clone();
    Ok(Json(
        ApiResponse::ok(project)
            .with_message("Project created successfully")
            .with_id(id),
    ))
}

/// Partial update: only the fields present in the body change
pub async fn update_project(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    Path(id): Path<String>,
    AppJson(update): AppJson<ProjectUpdate>,
) -> Result<Json<ApiResponse<Project>>> {
    if update.is_empty() {
        return Err(AppError::InvalidInput("No fields to update".to_string()));
    }
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(FieldError::new("title", "field required").into());
    }

    let project = state
        .store
        .update_project(&id, update)
        .await?
        .ok_or_else(|| not_found(&id))?;
    tracing::info!(admin = %claims.sub, %id, "project updated");

    Ok(Json(
        ApiResponse::ok(project).with_message("Project updated successfully"),
    ))
}

pub async fn delete_project(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.store.delete_project(&id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(admin = %claims.sub, %id, "project deleted");

    Ok(Json(ApiResponse::done("Project deleted successfully")))
}
