use crate::types::ApiResponse;
use crate::utils::toml_config::ClientConfig;
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by the admin client, normalised for display with
/// [`ClientError::user_message`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// No response was received
    #[error("network error: {0}")]
    Network(String),

    /// 401 from the server; the stored token has been cleared
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// First entry of a validation-error array
    #[error("validation error: {msg} for field '{field}'")]
    Validation { field: String, msg: String },

    #[error("server error {status}")]
    Server {
        status: u16,
        detail: Option<String>,
        message: Option<String>,
    },

    /// A 2xx response whose envelope said `success: false`
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// The single human-readable line shown in an error toast.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => "Network error - please check your connection".to_string(),
            ClientError::Unauthorized(detail) => detail.clone(),
            ClientError::Validation { field, msg } => {
                format!("Validation Error: {} for field '{}'", msg, field)
            }
            ClientError::Server {
                status,
                detail,
                message,
            } => detail
                .clone()
                .or_else(|| message.clone())
                .unwrap_or_else(|| format!("Server error: {}", status)),
            ClientError::Rejected(message) => message.clone(),
            ClientError::Decode(e) => format!("Request failed: {}", e),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Builds the error for a non-2xx response from its status and JSON body.
    pub fn from_response_body(status: StatusCode, body: &Value) -> Self {
        let detail = body.get("detail");

        if let Some(entries) = detail.and_then(Value::as_array) {
            if let Some(first) = entries.first() {
                if let Some(msg) = first.get("msg").and_then(Value::as_str) {
                    let field = first
                        .get("loc")
                        .and_then(|loc| loc.get(1))
                        .map(|f| match f {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .unwrap_or_default();
                    return ClientError::Validation {
                        field,
                        msg: msg.to_string(),
                    };
                }
            }
        }

        let detail = detail.and_then(Value::as_str).map(str::to_string);
        if status == StatusCode::UNAUTHORIZED {
            return ClientError::Unauthorized(
                detail.unwrap_or_else(|| "Not authenticated".to_string()),
            );
        }

        ClientError::Server {
            status: status.as_u16(),
            detail,
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// The session-scoped bearer token. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

/// HTTP pipeline shared by the public and admin facades.
///
/// Every request carries the stored bearer token when there is one; a 401
/// response clears it so the next guard check sends the admin to login.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    tokens: TokenStore,
}

impl ApiClient {
    /// `backend_url` is the server origin; requests go to `<backend_url>/api`.
    pub fn new(backend_url: &str, tokens: TokenStore) -> Result<Self, ClientError> {
        Self::with_timeout(backend_url, tokens, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        backend_url: &str,
        tokens: TokenStore,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base: format!("{}/api", backend_url.trim_end_matches('/')),
            tokens,
        })
    }

    pub fn from_config(config: &ClientConfig, tokens: TokenStore) -> Result<Self, ClientError> {
        Self::with_timeout(&config.base_url, tokens, config.timeout())
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base, path));
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("401 from server, clearing stored token");
            self.tokens.clear();
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(ClientError::from_response_body(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Self::decode(self.send(self.request(Method::GET, path)).await?).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        Self::decode(self.send(self.request(Method::GET, path).query(query)).await?).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        Self::decode(self.send(self.request(Method::POST, path).json(body)).await?).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Self::decode(self.send(self.request(Method::POST, path)).await?).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        Self::decode(self.send(self.request(Method::PUT, path).json(body)).await?).await
    }

    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Self::decode(self.send(self.request(Method::PUT, path)).await?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Self::decode(self.send(self.request(Method::DELETE, path)).await?).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        Self::decode(self.send(self.request(Method::POST, path).multipart(form)).await?).await
    }
}

/// Returns `data` from a successful envelope.
pub fn expect_data<T>(response: ApiResponse<T>) -> Result<T, ClientError> {
    if !response.success {
        return Err(ClientError::Rejected(
            response.message.unwrap_or_else(|| "Request failed".to_string()),
        ));
    }
    response
        .data
        .ok_or_else(|| ClientError::Decode("response carried no data".to_string()))
}

/// Returns the message of a successful data-less envelope.
pub fn expect_ack(response: ApiResponse<Value>) -> Result<String, ClientError> {
    if !response.success {
        return Err(ClientError::Rejected(
            response.message.unwrap_or_else(|| "Request failed".to_string()),
        ));
    }
    Ok(response.message.unwrap_or_default())
}
