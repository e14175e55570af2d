use crate::{
    auth::middleware::AuthAdmin,
    types::{ApiResponse, DashboardSummary, Result},
    AppState,
};
use axum::{extract::State, Json};

/// Counts and the newest messages, polled by the admin panel
pub async fn summary(
    State(state): State<AppState>,
    AuthAdmin(_claims): AuthAdmin,
) -> Result<Json<ApiResponse<DashboardSummary>>> {
    Ok(Json(ApiResponse::ok(state.store.dashboard_summary().await?)))
}
