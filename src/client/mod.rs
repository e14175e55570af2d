//! Admin-side runtime for the portfolio.
//!
//! - [`http`] - authenticated request pipeline and error normalisation
//! - [`public`] - public section reads, with bundled fallback content
//! - [`admin`] - authenticated CRUD for every section
//! - [`session`] - admin session: save-handler registry and summary poller
//! - [`guard`] - login redirect for `/admin/*`
//! - [`manager`] - per-section edit state machines

pub mod admin;
pub mod guard;
pub mod http;
pub mod manager;
pub mod mock;
pub mod public;
pub mod session;

pub use admin::AdminApi;
pub use guard::{enter_admin_area, AdminArea, AuthGuard, GuardDecision, LOGIN_PATH};
pub use http::{ApiClient, ClientError, TokenStore};
pub use manager::{
    AdminUsersManager, Confirm, DocumentManager, LearningJourneyManager, ListManager,
    ManagerContext, ManagerState, MessagesManager, Notifier, ProjectsManager, RecordingNotifier,
    SkillsManager, Toast, TracingNotifier,
};
pub use public::{PortfolioContent, PublicApi};
pub use session::{AdminSession, SaveHandler, SaveOutcome, SaveRegistration, SummaryPoller};
