//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Admin user management.
pub mod admins;
/// Login, token verification and session notices.
pub mod auth;
/// Dashboard summary.
pub mod dashboard;
/// Learning journey phases.
pub mod learning_journey;
/// Contact form and admin inbox.
pub mod messages;
/// Admin notifications.
pub mod notifications;
/// Projects CRUD.
pub mod projects;
/// Status and health.
pub mod public;
/// Cross-section text search.
pub mod search;
/// Whole-document sections, generic over the section type.
pub mod sections;
/// Skills by category.
pub mod skills;
/// Resume upload.
pub mod upload;
