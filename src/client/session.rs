//! Admin-area session: who is signed in, the dashboard summary behind the
//! header badges, and the single save action the floating save button runs.
//!
//! A session is a value owned by whoever mounts the admin area and handed to
//! managers as `Arc<AdminSession>`; several can coexist.

use super::admin::AdminApi;
use super::http::ClientError;
use crate::types::{AdminUser, DashboardSummary};
use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A page-supplied action that persists that page's current edits.
pub type SaveHandler = Arc<dyn Fn() -> BoxFuture<'static, Result<(), ClientError>> + Send + Sync>;

/// What `on_save` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No handler was registered
    Idle,
    /// A save was already in flight
    Busy,
    Saved,
}

#[derive(Default)]
struct SessionState {
    admin_profile: Option<AdminUser>,
    summary: Option<DashboardSummary>,
    unread_notif_count: u64,
}

pub struct AdminSession {
    api: AdminApi,
    state: RwLock<SessionState>,
    /// Current handler tagged with its registration id
    save_handler: RwLock<Option<(u64, SaveHandler)>>,
    next_registration: AtomicU64,
    is_saving: AtomicBool,
}

/// Clears `is_saving` when dropped, including when the save future is cancelled.
struct SavingFlag<'a>(&'a AtomicBool);

impl Drop for SavingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AdminSession {
    pub fn new(api: AdminApi) -> Arc<Self> {
        Arc::new(Self {
            api,
            state: RwLock::new(SessionState::default()),
            save_handler: RwLock::new(None),
            next_registration: AtomicU64::new(1),
            is_saving: AtomicBool::new(false),
        })
    }

    pub fn api(&self) -> &AdminApi {
        &self.api
    }

    // ============= Save-handler registry =============

    /// Replaces the current handler (`Some`) or removes it (`None`).
    pub fn set_save_handler(&self, handler: Option<SaveHandler>) {
        let entry = handler.map(|h| (self.next_registration.fetch_add(1, Ordering::Relaxed), h));
        *self.save_handler.write() = entry;
    }

    /// Registers `handler` and returns a guard that removes it on drop, unless
    /// another page has registered since.
    pub fn register_save_handler(self: &Arc<Self>, handler: SaveHandler) -> SaveRegistration {
        let id = self.next_registration.fetch_add(1, Ordering::Relaxed);
        *self.save_handler.write() = Some((id, handler));

        SaveRegistration {
            session: Arc::downgrade(self),
            id,
        }
    }

    fn clear_registration(&self, id: u64) {
        let mut slot = self.save_handler.write();
        if matches!(slot.as_ref(), Some((current, _)) if *current == id) {
            *slot = None;
        }
    }

    pub fn is_save_visible(&self) -> bool {
        self.save_handler.read().is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving.load(Ordering::Acquire)
    }

    /// Runs the handler registered right now.
    ///
    /// The handler's error is returned unchanged; `is_saving` is cleared
    /// either way.
    pub async fn on_save(&self) -> Result<SaveOutcome, ClientError> {
        let handler = match self.save_handler.read().as_ref() {
            Some((_, handler)) => Arc::clone(handler),
            None => return Ok(SaveOutcome::Idle),
        };

        if self
            .is_saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(SaveOutcome::Busy);
        }
        let _flag = SavingFlag(&self.is_saving);

        handler().await.map(|_| SaveOutcome::Saved)
    }

    // ============= Summary =============

    pub fn admin_profile(&self) -> Option<AdminUser> {
        self.state.read().admin_profile.clone()
    }

    pub fn summary(&self) -> Option<DashboardSummary> {
        self.state.read().summary.clone()
    }

    pub fn unread_notif_count(&self) -> u64 {
        self.state.read().unread_notif_count
    }

    pub fn unread_message_count(&self) -> u64 {
        self.state
            .read()
            .summary
            .as_ref()
            .map_or(0, |s| s.unread_message_count)
    }

    /// Re-fetches the summary now. Failures are logged and the previous
    /// summary is kept; returns whether it was updated.
    pub async fn refresh_summary(&self) -> bool {
        match self.api.dashboard_summary().await {
            Ok(summary) => {
                let mut state = self.state.write();
                state.unread_notif_count = summary.unread_notification_count;
                state.summary = Some(summary);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch dashboard summary");
                false
            }
        }
    }

    pub async fn load_admin_profile(&self) -> bool {
        match self.api.me().await {
            Ok(admin) => {
                self.state.write().admin_profile = Some(admin);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch admin profile");
                false
            }
        }
    }

    /// Admin-area mount: loads the profile and summary, then polls the summary
    /// every `interval` until the returned poller is dropped.
    pub async fn mount(self: &Arc<Self>, interval: Duration) -> SummaryPoller {
        tokio::join!(self.load_admin_profile(), self.refresh_summary());
        SummaryPoller::spawn(Arc::downgrade(self), interval)
    }
}

/// Keeps a page's save handler registered for as long as it lives.
#[must_use = "dropping the registration immediately unregisters the handler"]
pub struct SaveRegistration {
    session: Weak<AdminSession>,
    id: u64,
}

impl SaveRegistration {
    pub fn is_current(&self) -> bool {
        self.session.upgrade().is_some_and(|session| {
            matches!(session.save_handler.read().as_ref(), Some((current, _)) if *current == self.id)
        })
    }
}

impl Drop for SaveRegistration {
    fn drop(&mut self) {
        if let Some(session) = self.session.upgrade() {
            session.clear_registration(self.id);
        }
    }
}

/// Background task refreshing the dashboard summary on a fixed interval.
///
/// Stops when dropped, when `stop` is called, or once the session is gone.
pub struct SummaryPoller {
    handle: Option<JoinHandle<()>>,
}

impl SummaryPoller {
    fn spawn(session: Weak<AdminSession>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately and mount has just fetched
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(session) = session.upgrade() else {
                    tracing::debug!("admin session dropped, summary poller exiting");
                    break;
                };
                session.refresh_summary().await;
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for SummaryPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
