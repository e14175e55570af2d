use crate::api::handlers::{
    admins, auth, dashboard, learning_journey, messages, notifications, projects, public, search,
    sections::{get_section, put_section},
    skills, upload,
};
use crate::auth::jwt::AuthService;
use crate::types::{
    ContactSection, Education, Experience, Experiments, Footer, GrowthMindset, Profile,
};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

/// Routes mounted under `/api`.
pub fn create_router(auth_service: Arc<AuthService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/health", get(public::health))
        .route("/profile", get(get_section::<Profile>))
        .route("/skills", get(skills::get_skills))
        .route("/projects", get(projects::list_projects))
        .route("/education", get(get_section::<Education>))
        .route("/experience", get(get_section::<Experience>))
        .route("/learning-journey", get(learning_journey::list_phases))
        .route("/growth-mindset", get(get_section::<GrowthMindset>))
        .route("/experiments", get(get_section::<Experiments>))
        .route("/contact-section", get(get_section::<ContactSection>))
        .route("/footer", get(get_section::<Footer>))
        .route("/contact", post(messages::submit_contact))
        .route("/admin/login", post(auth::login));

    let protected_routes = Router::new()
        // Session
        .route("/admin/verify", get(auth::verify))
        .route("/admin/me", get(auth::me))
        .route("/admin/logout-notify", post(auth::logout_notify))
        // Whole-document sections
        .route("/admin/profile", put(put_section::<Profile>))
        .route("/admin/education", put(put_section::<Education>))
        .route("/admin/experience", put(put_section::<Experience>))
        .route("/admin/growth-mindset", put(put_section::<GrowthMindset>))
        .route("/admin/experiments", put(put_section::<Experiments>))
        .route("/admin/contact-section", put(put_section::<ContactSection>))
        .route("/admin/footer", put(put_section::<Footer>))
        // Per-item sections
        .route(
            "/admin/skills/{category}",
            put(skills::put_skill_category).delete(skills::delete_skill_category),
        )
        .route("/admin/projects", post(projects::create_project))
        .route(
            "/admin/projects/{id}",
            put(projects::update_project).delete(projects::delete_project),
        )
        .route(
            "/admin/learning-journey",
            post(learning_journey::create_phase),
        )
        .route(
            "/admin/learning-journey/{id}",
            put(learning_journey::update_phase).delete(learning_journey::delete_phase),
        )
        // Inbox
        .route("/admin/messages", get(messages::list_messages))
        .route("/admin/messages/{id}/read", put(messages::mark_message_read))
        .route("/admin/messages/{id}", delete(messages::delete_message))
        .route(
            "/admin/notifications",
            get(notifications::list_notifications).delete(notifications::clear_notifications),
        )
        .route(
            "/admin/notifications/{id}/read",
            put(notifications::mark_notification_read),
        )
        .route(
            "/admin/notifications/mark-read",
            post(notifications::mark_all_read),
        )
        // Admin users
        .route(
            "/admin/users",
            get(admins::list_admins).post(admins::create_admin),
        )
        .route("/admin/users/{username}", delete(admins::delete_admin))
        // Dashboard, search, uploads
        .route("/admin/dashboard-summary", get(dashboard::summary))
        .route("/admin/search", get(search::search))
        .route("/admin/upload-resume", post(upload::upload_resume))
        .layer(middleware::from_fn(move |req, next| {
            crate::auth::middleware::auth_middleware(auth_service.clone(), req, next)
        }));

    public_routes.merge(protected_routes)
}

/// The complete application: `/api`, uploaded files, CORS, tracing and body limits.
pub fn app(state: AppState) -> Router {
    let config = state.config_manager.config();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(public::root))
        .route("/api/", get(public::root))
        .route("/health", get(public::health))
        .nest("/api", create_router(state.auth_service.clone()))
        .nest_service("/uploads", ServeDir::new(&config.uploads.dir))
        .layer(DefaultBodyLimit::disable())
        // Multipart framing adds a little on top of the file itself
        .layer(RequestBodyLimitLayer::new(config.uploads.max_bytes + 64 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
