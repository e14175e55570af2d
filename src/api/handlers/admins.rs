use crate::{
    api::extract::AppJson,
    auth::middleware::AuthAdmin,
    types::{
        AdminCreate, AdminRole, AdminUser, ApiResponse, AppError, NotificationKind, Result,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn list_admins(
    State(state): State<AppState>,
    AuthAdmin(_claims): AuthAdmin,
) -> Result<Json<ApiResponse<Vec<AdminUser>>>> {
    Ok(Json(ApiResponse::list(state.store.list_admins().await?)))
}

pub async fn create_admin(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    AppJson(input): AppJson<AdminCreate>,
) -> Result<Json<ApiResponse<AdminUser>>> {
    input.validate()?;

    let password_hash = state.auth_service.hash_password(&input.password)?;
    let admin = state
        .store
        .create_admin(
            input.username.trim(),
            &password_hash,
            input.name.trim(),
            &input.profile_image,
            AdminRole::Admin,
        )
        .await?;

    state
        .store
        .create_notification(
            NotificationKind::AdminCreated,
            format!("Admin '{}' created by {}", admin.username, claims.sub),
        )
        .await?;
    tracing::info!(admin = %claims.sub, created = %admin.username, "admin user created");

    let id = admin.id.clone();
    Ok(Json(
        ApiResponse::ok(admin)
            .with_message("Admin user created successfully")
            .with_id(id),
    ))
}

/// Deletes another admin; the owner and the caller's own account are protected
pub async fn delete_admin(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    if username == claims.sub {
        return Err(AppError::Forbidden(
            "You cannot delete your own account".to_string(),
        ));
    }

    let target = state
        .store
        .get_admin(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Admin '{}' not found", username)))?;

    if target.role == AdminRole::Owner {
        return Err(AppError::Forbidden(
            "The owner account cannot be deleted".to_string(),
        ));
    }

    state.store.delete_admin(&username).await?;
    state
        .store
        .create_notification(
            NotificationKind::AdminDeleted,
            format!("Admin '{}' deleted by {}", username, claims.sub),
        )
        .await?;
    tracing::info!(admin = %claims.sub, deleted = %username, "admin user deleted");

    Ok(Json(ApiResponse::done("Admin user deleted successfully")))
}
