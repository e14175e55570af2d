use super::admin::AdminApi;
use super::http::TokenStore;
use super::session::{AdminSession, SummaryPoller};
use std::sync::Arc;
use std::time::Duration;

pub const LOGIN_PATH: &str = "/admin/login";

/// Outcome of a protected-route check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Keeps unauthenticated visitors out of `/admin/*` (login excepted).
#[derive(Debug, Clone)]
pub struct AuthGuard {
    tokens: TokenStore,
}

impl AuthGuard {
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }

    pub fn is_protected(path: &str) -> bool {
        let path = path.trim_end_matches('/');
        (path == "/admin" || path.starts_with("/admin/")) && path != LOGIN_PATH
    }

    pub fn check(&self, path: &str) -> GuardDecision {
        if Self::is_protected(path) && !self.tokens.is_authenticated() {
            tracing::debug!(path, "no token, redirecting to login");
            GuardDecision::Redirect(LOGIN_PATH)
        } else {
            GuardDecision::Allow
        }
    }
}

/// A mounted admin area: the session plus its running summary poller.
/// Dropping it is the admin-area unmount.
pub struct AdminArea {
    pub session: Arc<AdminSession>,
    pub poller: SummaryPoller,
}

/// Enters the admin area at `path`.
///
/// The guard runs first, so an unauthenticated visit issues no request at
/// all and yields the login redirect instead.
pub async fn enter_admin_area(
    api: &AdminApi,
    path: &str,
    poll_interval: Duration,
) -> Result<AdminArea, GuardDecision> {
    match AuthGuard::new(api.client().tokens().clone()).check(path) {
        GuardDecision::Allow => {}
        redirect => return Err(redirect),
    }

    let session = AdminSession::new(api.clone());
    let poller = session.mount(poll_interval).await;

    Ok(AdminArea { session, poller })
}
