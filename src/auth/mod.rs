//! Admin authentication.
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - token issuing/verification and password hashing
//! - [`auth::middleware`](crate::auth::middleware) - axum layer and extractor for `/api/admin/*`
//!
//! Tokens are HS256 JWTs signed with the secret named by `auth.jwt_secret_env`
//! in `folio.toml`; their subject is the admin username. There is no refresh
//! flow: when a token expires the admin panel drops it and sends the admin
//! back to the login page.
//!
//! ```ignore
//! async fn handler(AuthAdmin(claims): AuthAdmin) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.sub)
//! }
//! ```

/// Token generation, validation, and password hashing.
pub mod jwt;
/// Authentication middleware and extractor for protected routes.
pub mod middleware;
