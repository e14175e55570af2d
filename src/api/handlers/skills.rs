use crate::{
    api::extract::AppJson,
    auth::middleware::AuthAdmin,
    types::{
        normalize_category, validate_skills, ApiResponse, AppError, Result, SkillsByCategory,
        SkillsPayload,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn get_skills(State(state): State<AppState>) -> Result<Json<ApiResponse<SkillsByCategory>>> {
    Ok(Json(ApiResponse::ok(state.store.get_skills().await?)))
}

/// Replaces one category's list, creating the category if needed
pub async fn put_skill_category(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    Path(category): Path<String>,
    AppJson(payload): AppJson<SkillsPayload>,
) -> Result<Json<ApiResponse<()>>> {
    let category = normalize_category(&category);
    if category.is_empty() {
        return Err(AppError::InvalidInput(
            "Category name must not be empty".to_string(),
        ));
    }

    let skills = payload.into_skills();
    validate_skills(&skills)?;

    state.store.put_skill_category(&category, &skills).await?;
    tracing::info!(admin = %claims.sub, %category, count = skills.len(), "skills updated");

    Ok(Json(ApiResponse::done(format!(
        "Skills for {} updated successfully",
        category
    ))))
}

pub async fn delete_skill_category(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    let category = normalize_category(&category);
    if !state.store.delete_skill_category(&category).await? {
        return Err(AppError::NotFound(format!(
            "Skill category '{}' not found",
            category
        )));
    }
    tracing::info!(admin = %claims.sub, %category, "skill category deleted");

    Ok(Json(ApiResponse::done(format!(
        "Skill category {} deleted successfully",
        category
    ))))
}
