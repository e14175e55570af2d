//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Folio, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::extract`](crate::api::extract) - JSON extractor that answers in the error envelope
//!
//! # API Endpoints
//!
//! ## Public (`/api`)
//! - `GET /api/` - Status
//! - `GET /api/health` - Health check
//! - `GET /api/{section}` - One of `profile`, `skills`, `projects`, `education`,
//!   `experience`, `learning-journey`, `growth-mindset`, `experiments`,
//!   `contact-section`, `footer`
//! - `POST /api/contact` - Contact form submission
//! - `POST /api/admin/login` - Login and receive a JWT
//!
//! ## Admin (`/api/admin`)
//! - `GET /api/admin/verify`, `GET /api/admin/me`, `POST /api/admin/logout-notify`
//! - `PUT /api/admin/{section}` for whole-document sections
//! - `PUT|DELETE /api/admin/skills/{category}`
//! - `POST /api/admin/projects`, `PUT|DELETE /api/admin/projects/{id}`
//! - `POST /api/admin/learning-journey`, `PUT|DELETE /api/admin/learning-journey/{id}`
//! - `GET /api/admin/messages`, `PUT /api/admin/messages/{id}/read`, `DELETE /api/admin/messages/{id}`
//! - `GET|DELETE /api/admin/notifications`, `PUT /api/admin/notifications/{id}/read`,
//!   `POST /api/admin/notifications/mark-read`
//! - `GET|POST /api/admin/users`, `DELETE /api/admin/users/{username}`
//! - `GET /api/admin/dashboard-summary`
//! - `GET /api/admin/search?q=`
//! - `POST /api/admin/upload-resume`
//!
//! # Authentication
//!
//! Admin endpoints require a valid JWT token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// JSON body extractor with enveloped rejections.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
