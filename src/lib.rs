//! # Folio - portfolio content server and admin runtime
//!
//! Folio serves the content of a personal portfolio site (profile, skills,
//! projects, education, experience, learning journey, growth mindset,
//! experiments, contact section and footer) over a small REST API, and ships
//! the runtime an admin panel needs to edit that content.
//!
//! ## Overview
//!
//! Folio can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `folio-server` binary
//! 2. **As a library** - Embed the router, or drive the admin API from Rust
//!
//! ### Serving
//!
//! ```rust,ignore
//! use folio::{api, AppState, FolioConfigManager};
//!
//! let config_manager = FolioConfigManager::new("folio.toml")?;
//! let state = AppState::from_config(config_manager).await?;
//! let app = api::routes::app(state);
//! ```
//!
//! ### Editing content
//!
//! ```rust,ignore
//! use folio::client::{AdminSession, ApiClient, TokenStore};
//!
//! let client = ApiClient::new("http://127.0.0.1:8001", TokenStore::default())?;
//! let admin = folio::client::AdminApi::new(client.clone());
//! admin.login("admin", "secret").await?;
//!
//! let session = AdminSession::new(admin.clone());
//! let _poller = session.mount(std::time::Duration::from_secs(3)).await;
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST handlers and routes
//! - [`auth`] - JWT authentication and middleware
//! - [`client`] - Admin-side HTTP pipeline, session and section managers
//! - [`db`] - libsql persistence and seed content
//! - [`types`] - Content records, envelopes and error handling
//! - [`utils`] - `folio.toml` configuration with hot reload

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// JWT authentication and middleware.
pub mod auth;
/// Command-line interface for the server binary.
pub mod cli;
/// Admin client runtime (session, managers, public fetch with fallback).
pub mod client;
/// Portfolio store (libsql).
pub mod db;
/// Core types (content records, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

pub use db::PortfolioStore;
pub use types::{AppError, Result};
pub use utils::toml_config::{FolioConfig, FolioConfigManager};

use crate::auth::jwt::AuthService;
use crate::db::DatabaseProvider;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based configuration with hot-reload support
    pub config_manager: Arc<FolioConfigManager>,
    /// Content store
    pub store: Arc<PortfolioStore>,
    /// Authentication service
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Opens the configured store, seeds it when empty and bootstraps the owner.
    pub async fn from_config(config_manager: FolioConfigManager) -> anyhow::Result<Self> {
        let config = config_manager.config();

        let store = DatabaseProvider::from_url(&config.database.url)
            .connect()
            .await?;
        let auth_service = AuthService::new(config.jwt_secret()?, config.auth.jwt_expiry);

        if config.database.seed_on_start {
            db::seed::seed_portfolio(&store).await?;
        }

        match config.admin_password() {
            Ok(password) => {
                db::seed::ensure_owner(
                    &store,
                    &auth_service,
                    &config.auth.admin_username,
                    &password,
                )
                .await?;
            }
            Err(e) => tracing::warn!("owner bootstrap skipped: {}", e),
        }

        Ok(Self {
            config_manager: Arc::new(config_manager),
            store: Arc::new(store),
            auth_service: Arc::new(auth_service),
        })
    }
}
