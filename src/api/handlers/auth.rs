use crate::{
    api::extract::AppJson,
    auth::middleware::AuthAdmin,
    types::{AdminUser, ApiResponse, AppError, LoginRequest, NotificationKind, Result, TokenResponse},
    AppState,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Login with username and password
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let invalid = || AppError::Auth("Incorrect username or password".to_string());

    let (admin, password_hash) = state
        .store
        .get_admin_credentials(payload.username.trim())
        .await?
        .ok_or_else(invalid)?;

    if !state
        .auth_service
        .verify_password(&payload.password, &password_hash)?
    {
        tracing::warn!(username = %admin.username, "failed admin login");
        return Err(invalid());
    }

    let tokens = state
        .auth_service
        .generate_token(&admin.username, admin.role)?;

    state
        .store
        .create_notification(
            NotificationKind::Login,
            format!("Admin '{}' logged in", admin.username),
        )
        .await?;
    tracing::info!(username = %admin.username, "admin logged in");

    Ok(Json(tokens))
}

/// Confirms the bearer token is still valid
pub async fn verify(AuthAdmin(claims): AuthAdmin) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(json!({
        "username": claims.sub,
        "role": claims.role,
    })))
}

/// The signed-in admin's profile
pub async fn me(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
) -> Result<Json<ApiResponse<AdminUser>>> {
    let admin = state
        .store
        .get_admin(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Auth("Admin account no longer exists".to_string()))?;

    Ok(Json(ApiResponse::ok(admin)))
}

/// Records a logout; the token itself simply stops being sent by the client
pub async fn logout_notify(
    State(state): State<AppState>,
    AuthAdmin(claims): AuthAdmin,
) -> Result<Json<ApiResponse<()>>> {
    state
        .store
        .create_notification(
            NotificationKind::Logout,
            format!("Admin '{}' logged out", claims.sub),
        )
        .await?;
    tracing::info!(username = %claims.sub, "admin logged out");

    Ok(Json(ApiResponse::done("Logout recorded")))
}
