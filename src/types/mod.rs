//! Shared request/response types, content records and the error type.
//!
//! Everything in here is used on both sides of the wire: the axum handlers
//! serialize these types and the admin client in [`crate::client`]
//! deserializes them.

use serde::{Deserialize, Serialize};

/// Typed content records for every portfolio section.
pub mod content;

pub use content::*;

// ============= Response Envelope =============

/// The `{success, data, message}` envelope every endpoint answers with.
///
/// Clients branch on `success` before trusting `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Item count for list endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    /// Identifier assigned by the server on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Public location of an uploaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            total: None,
            id: None,
            url: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// A list response carrying `total`.
    pub fn list(data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            total: Some(total),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<()> {
    /// A data-less success carrying only a human-readable message.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            total: None,
            id: None,
            url: None,
        }
    }
}

// ============= Authentication Types =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username
    pub sub: String,
    pub role: AdminRole,
    pub exp: usize,
    pub iat: usize,
}

// ============= Error Types =============

/// A single offending field, rendered the way validation errors travel on
/// the wire: `{"loc": ["body", field], "msg": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            msg: msg.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {} for field '{}'", .0.msg, .0.field)]
    Validation(FieldError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::Validation(err)
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, detail) = match self {
            AppError::Database(msg) => {
                tracing::error!("database failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::Value::from("Internal server error"),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("internal failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::Value::from("Internal server error"),
                )
            }
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.into()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.into()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.into()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.into()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.into()),
            AppError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!([{
                    "loc": ["body", err.field],
                    "msg": err.msg,
                    "type": "value_error"
                }]),
            ),
        };

        let body = serde_json::json!({
            "success": false,
            "detail": detail
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_without_data_for_record_type() {
        // AdminUser has no Default; a data-less envelope must still decode
        let response: ApiResponse<AdminUser> =
            serde_json::from_value(json!({ "success": false, "message": "Admin not found" }))
                .unwrap();

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("Admin not found"));
    }

    #[test]
    fn test_envelope_with_record_list() {
        let response: ApiResponse<Vec<Project>> = serde_json::from_value(json!({
            "success": true,
            "data": [{
                "id": "p-1",
                "title": "Folio",
                "description": "CMS",
                "status": "completed",
                "createdAt": "2026-01-01T00:00:00Z",
                "updatedAt": "2026-01-01T00:00:00Z"
            }],
            "total": 1
        }))
        .unwrap();

        assert_eq!(response.total, Some(1));
        assert_eq!(response.data.unwrap()[0].title, "Folio");
    }

    #[test]
    fn test_validation_error_renders_as_field_list() {
        use axum::response::IntoResponse;

        let response = AppError::from(FieldError::new("title", "field required")).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
