//! Section managers: fetch on mount, edit a local copy, persist on save.
//!
//! Every manager moves through `Loading -> Ready -> Saving -> Ready`, or
//! lands in `Error` when the initial load fails. Admin pages get no fallback
//! data. A save failure leaves the local copy as it was so the admin can
//! retry.
//!
//! Managers are dropped on unmount. Dropping one unregisters its save handler,
//! and any response still in flight is discarded instead of applied.

use super::admin::AdminApi;
use super::http::ClientError;
use super::session::{AdminSession, SaveHandler, SaveRegistration};
use crate::types::{
    normalize_category, AdminCreate, AdminUser, ContactMessage, LearningPhase, LearningPhaseDraft,
    Project, ProjectDraft, ProjectUpdate, SectionDocument, Skill, SkillsByCategory,
};
use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerState {
    Loading,
    Ready,
    Saving,
    /// Initial load failed; carries the normalised message
    Error(String),
}

/// Blocking yes/no prompt shown before destructive actions.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Toast sink.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Confirms everything. For headless callers that already asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Writes toasts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(toast = "success", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(toast = "error", "{}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

/// Keeps every toast in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.toasts.lock().push(Toast::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.toasts.lock().push(Toast::Error(message.to_string()));
    }
}

/// What every manager needs from the admin area it is mounted in.
#[derive(Clone)]
pub struct ManagerContext {
    pub session: Arc<AdminSession>,
    pub notifier: Arc<dyn Notifier>,
    pub confirm: Arc<dyn Confirm>,
}

impl ManagerContext {
    pub fn new(session: Arc<AdminSession>) -> Self {
        Self {
            session,
            notifier: Arc::new(TracingNotifier),
            confirm: Arc::new(AlwaysConfirm),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_confirm(mut self, confirm: Arc<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn api(&self) -> &AdminApi {
        self.session.api()
    }
}

// ============= Shared manager core =============

struct Managed<T> {
    ctx: ManagerContext,
    state: RwLock<ManagerState>,
    data: RwLock<T>,
    mounted: AtomicBool,
}

impl<T: Clone + Send + Sync + 'static> Managed<T> {
    fn new(ctx: ManagerContext, data: T) -> Arc<Self> {
        Arc::new(Self {
            ctx,
            state: RwLock::new(ManagerState::Loading),
            data: RwLock::new(data),
            mounted: AtomicBool::new(true),
        })
    }

    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    fn state(&self) -> ManagerState {
        self.state.read().clone()
    }

    fn set_state(&self, state: ManagerState) {
        if self.is_mounted() {
            *self.state.write() = state;
        }
    }

    fn snapshot(&self) -> T {
        self.data.read().clone()
    }

    /// Mutates the local copy; a no-op after unmount.
    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        if self.is_mounted() {
            Some(f(&mut self.data.write()))
        } else {
            None
        }
    }

    /// Runs a fetch and, if still mounted, replaces the local copy with the
    /// result. A failure moves the manager to `Error`.
    async fn load<F>(&self, label: &str, fetch: F) -> Result<(), ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.set_state(ManagerState::Loading);
        match fetch.await {
            Ok(data) => {
                if self.is_mounted() {
                    *self.data.write() = data;
                    *self.state.write() = ManagerState::Ready;
                } else {
                    tracing::debug!(section = label, "discarding response for unmounted manager");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(section = label, error = %e, "failed to load section");
                let message = e.user_message();
                self.set_state(ManagerState::Error(message.clone()));
                self.ctx.notifier.error(&message);
                Err(e)
            }
        }
    }

    /// Runs a mutation in the `Saving` state and reports its outcome.
    ///
    /// On success `on_ok` is applied to the local copy (if still mounted), a
    /// success toast is shown and the summary is refreshed once. On failure
    /// the local copy is left untouched.
    async fn mutate<R, F>(
        &self,
        action: F,
        success: impl FnOnce(&R) -> String,
        on_ok: impl FnOnce(&mut T, &R),
    ) -> Result<R, ClientError>
    where
        F: Future<Output = Result<R, ClientError>>,
    {
        self.set_state(ManagerState::Saving);
        let result = action.await;
        self.set_state(ManagerState::Ready);

        match result {
            Ok(value) => {
                self.update(|data| on_ok(data, &value));
                self.ctx.notifier.success(&success(&value));
                self.ctx.session.refresh_summary().await;
                Ok(value)
            }
            Err(e) => {
                self.ctx.notifier.error(&e.user_message());
                Err(e)
            }
        }
    }
}

/// Builds a save handler that calls back into a manager core while it lives.
fn save_handler<T, F, Fut>(core: &Arc<Managed<T>>, save: F) -> SaveHandler
where
    T: Clone + Send + Sync + 'static,
    F: Fn(Arc<Managed<T>>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ClientError>> + Send + 'static,
{
    let core: Weak<Managed<T>> = Arc::downgrade(core);
    let save = Arc::new(save);
    Arc::new(move || {
        let core = core.upgrade();
        let save = Arc::clone(&save);
        async move {
            match core {
                Some(core) if core.is_mounted() => save.as_ref()(core).await,
                _ => Ok(()),
            }
        }
        .boxed()
    })
}

// ============= Whole-document sections =============

/// Profile, education, experience, growth mindset, experiments, contact
/// section and footer: one document fetched, edited and saved whole.
pub struct DocumentManager<S: SectionDocument> {
    core: Arc<Managed<Option<S>>>,
    _registration: SaveRegistration,
}

impl<S: SectionDocument> DocumentManager<S> {
    /// Registers the save handler, then loads the document.
    pub async fn mount(ctx: ManagerContext) -> Self {
        let session = Arc::clone(&ctx.session);
        let core = Managed::new(ctx, None);
        let registration =
            session.register_save_handler(save_handler(&core, |core| async move {
                Self::save_core(&core).await
            }));

        let manager = Self {
            core,
            _registration: registration,
        };
        let _ = manager.reload().await;
        manager
    }

    pub async fn reload(&self) -> Result<(), ClientError> {
        let api = self.core.ctx.api().clone();
        self.core
            .load(S::KEY, async move { api.section::<S>().await.map(Some) })
            .await
    }

    pub fn state(&self) -> ManagerState {
        self.core.state()
    }

    pub fn data(&self) -> Option<S> {
        self.core.snapshot()
    }

    /// Edits the local copy only. Returns false before the document loaded.
    pub fn edit(&self, f: impl FnOnce(&mut S)) -> bool {
        self.core
            .update(|data| data.as_mut().map(f).is_some())
            .unwrap_or(false)
    }

    pub async fn save(&self) -> Result<(), ClientError> {
        Self::save_core(&self.core).await
    }

    async fn save_core(core: &Managed<Option<S>>) -> Result<(), ClientError> {
        let Some(document) = core.snapshot() else {
            let e = ClientError::Rejected(format!("{} has not loaded yet", S::LABEL));
            core.ctx.notifier.error(&e.user_message());
            return Err(e);
        };
        if let Err(field) = document.validate() {
            let e = ClientError::Validation {
                field: field.field,
                msg: field.msg,
            };
            core.ctx.notifier.error(&e.user_message());
            return Err(e);
        }

        let api = core.ctx.api().clone();
        core.mutate(
            async move { api.update_section(&document).await },
            |message| message.clone(),
            |_, _| {},
        )
        .await
        .map(|_| ())
    }
}

impl<S: SectionDocument> Drop for DocumentManager<S> {
    fn drop(&mut self) {
        self.core.unmount();
    }
}

// ============= Per-item sections =============

/// A record edited one item at a time (projects, learning phases).
#[async_trait]
pub trait ListItem: Clone + Send + Sync + 'static {
    type Draft: Clone + PartialEq + Send + Sync + 'static;

    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn to_draft(&self) -> Self::Draft;
    /// Blank draft for a new item appended at `position` (0-based).
    fn new_draft(position: usize) -> Self::Draft;

    async fn list(api: &AdminApi) -> Result<Vec<Self>, ClientError>;
    async fn create(api: &AdminApi, draft: &Self::Draft) -> Result<Self, ClientError>;
    async fn update(api: &AdminApi, id: &str, draft: &Self::Draft) -> Result<Self, ClientError>;
    async fn delete(api: &AdminApi, id: &str) -> Result<String, ClientError>;
}

#[async_trait]
impl ListItem for Project {
    type Draft = ProjectDraft;

    const LABEL: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> ProjectDraft {
        ProjectDraft::from(self)
    }

    fn new_draft(_position: usize) -> ProjectDraft {
        ProjectDraft {
            title: "New Project".to_string(),
            status: "coming-soon".to_string(),
            ..Default::default()
        }
    }

    async fn list(api: &AdminApi) -> Result<Vec<Self>, ClientError> {
        api.projects().await
    }

    async fn create(api: &AdminApi, draft: &ProjectDraft) -> Result<Self, ClientError> {
        api.create_project(draft).await
    }

    async fn update(api: &AdminApi, id: &str, draft: &ProjectDraft) -> Result<Self, ClientError> {
        api.update_project(id, &ProjectUpdate::from(draft.clone()))
            .await
    }

    async fn delete(api: &AdminApi, id: &str) -> Result<String, ClientError> {
        api.delete_project(id).await
    }
}

#[async_trait]
impl ListItem for LearningPhase {
    type Draft = LearningPhaseDraft;

    const LABEL: &'static str = "learning phase";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> LearningPhaseDraft {
        LearningPhaseDraft::from(self)
    }

    fn new_draft(position: usize) -> LearningPhaseDraft {
        LearningPhaseDraft {
            phase: "New Phase".to_string(),
            skills: Vec::new(),
            status: "planned".to_string(),
            order: position as i64 + 1,
        }
    }

    async fn list(api: &AdminApi) -> Result<Vec<Self>, ClientError> {
        api.learning_journey().await
    }

    async fn create(api: &AdminApi, draft: &LearningPhaseDraft) -> Result<Self, ClientError> {
        api.create_learning_phase(draft).await
    }

    async fn update(
        api: &AdminApi,
        id: &str,
        draft: &LearningPhaseDraft,
    ) -> Result<Self, ClientError> {
        api.update_learning_phase(id, draft).await
    }

    async fn delete(api: &AdminApi, id: &str) -> Result<String, ClientError> {
        api.delete_learning_phase(id).await
    }
}

/// One row of a list editor. `id` is `None` until the server assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry<D> {
    pub id: Option<String>,
    pub draft: D,
    pub dirty: bool,
}

pub struct ListManager<I: ListItem> {
    core: Arc<Managed<Vec<ListEntry<I::Draft>>>>,
    _registration: SaveRegistration,
}

fn entries_from<I: ListItem>(items: Vec<I>) -> Vec<ListEntry<I::Draft>> {
    items
        .into_iter()
        .map(|item| ListEntry {
            id: Some(item.id().to_string()),
            draft: item.to_draft(),
            dirty: false,
        })
        .collect()
}

impl<I: ListItem> ListManager<I> {
    /// Registers a handler that saves every changed row, then loads.
    pub async fn mount(ctx: ManagerContext) -> Self {
        let session = Arc::clone(&ctx.session);
        let core = Managed::new(ctx, Vec::new());
        let registration =
            session.register_save_handler(save_handler(&core, |core| async move {
                Self::save_dirty(&core).await
            }));

        let manager = Self {
            core,
            _registration: registration,
        };
        let _ = manager.reload().await;
        manager
    }

    pub async fn reload(&self) -> Result<(), ClientError> {
        let api = self.core.ctx.api().clone();
        self.core
            .load(I::LABEL, async move { I::list(&api).await.map(entries_from::<I>) })
            .await
    }

    /// Re-fetches after a write that already landed. Rows still dirty locally
    /// are kept over the server copy, and a failed fetch leaves the local rows
    /// and the `Ready` state alone.
    async fn reconcile(core: &Managed<Vec<ListEntry<I::Draft>>>) {
        let api = core.ctx.api().clone();
        match I::list(&api).await {
            Ok(items) => {
                core.update(|entries| {
                    let mut fresh = entries_from::<I>(items);
                    for local in entries.drain(..).filter(|entry| entry.dirty) {
                        match fresh
                            .iter_mut()
                            .find(|row| row.id.is_some() && row.id == local.id)
                        {
                            Some(row) => *row = local,
                            None => fresh.push(local),
                        }
                    }
                    *entries = fresh;
                });
            }
            Err(e) => {
                tracing::warn!(section = I::LABEL, error = %e, "re-fetch after save failed, keeping local rows");
            }
        }
    }

    pub fn state(&self) -> ManagerState {
        self.core.state()
    }

    pub fn entries(&self) -> Vec<ListEntry<I::Draft>> {
        self.core.snapshot()
    }

    pub fn len(&self) -> usize {
        self.core.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a blank, unsaved row and returns its index.
    pub fn add_draft(&self) -> Option<usize> {
        self.core.update(|entries| {
            entries.push(ListEntry {
                id: None,
                draft: I::new_draft(entries.len()),
                dirty: true,
            });
            entries.len() - 1
        })
    }

    pub fn edit_item(&self, index: usize, f: impl FnOnce(&mut I::Draft)) -> bool {
        self.core
            .update(|entries| match entries.get_mut(index) {
                Some(entry) => {
                    f(&mut entry.draft);
                    entry.dirty = true;
                    true
                }
                None => false,
            })
            .unwrap_or(false)
    }

    /// Writes one row, then records the outcome on the local copy: the row
    /// takes its server id and is clean unless it was edited meanwhile.
    async fn persist(
        core: &Managed<Vec<ListEntry<I::Draft>>>,
        index: usize,
        entry: &ListEntry<I::Draft>,
    ) -> Result<I, ClientError> {
        let api = core.ctx.api().clone();
        let saved = match entry.id.as_deref() {
            Some(id) => I::update(&api, id, &entry.draft).await?,
            None => I::create(&api, &entry.draft).await?,
        };

        core.update(|entries| {
            if let Some(row) = entries.get_mut(index) {
                if row.id == entry.id {
                    row.id = Some(saved.id().to_string());
                    if row.draft == entry.draft {
                        row.dirty = false;
                    }
                }
            }
        });
        Ok(saved)
    }

    /// POSTs a new row or PUTs an existing one, then re-fetches the list.
    pub async fn save_item(&self, index: usize) -> Result<(), ClientError> {
        let Some(entry) = self.core.data.read().get(index).cloned() else {
            return Err(ClientError::Rejected(format!("No {} at row {}", I::LABEL, index)));
        };

        self.core
            .mutate(
                Self::persist(&self.core, index, &entry),
                |_| format!("Saved {}", I::LABEL),
                |_, _| {},
            )
            .await?;

        Self::reconcile(&self.core).await;
        Ok(())
    }

    /// Saves every changed row in order, stopping at the first failure.
    /// Rows written before the failure are already marked saved, so a retry
    /// only sends what is left.
    pub async fn save_all(&self) -> Result<(), ClientError> {
        Self::save_dirty(&self.core).await
    }

    async fn save_dirty(core: &Managed<Vec<ListEntry<I::Draft>>>) -> Result<(), ClientError> {
        let dirty: Vec<_> = core
            .snapshot()
            .into_iter()
            .enumerate()
            .filter(|(_, entry)| entry.dirty)
            .collect();
        if dirty.is_empty() {
            return Ok(());
        }

        let count = dirty.len();
        core.mutate(
            async {
                for (index, entry) in &dirty {
                    Self::persist(core, *index, entry).await?;
                }
                Ok(())
            },
            |_| format!("Saved {} {} change(s)", count, I::LABEL),
            |_, _| {},
        )
        .await?;

        Self::reconcile(core).await;
        Ok(())
    }

    /// Deletes a row after confirmation. Returns false when the admin
    /// declined. Rows never saved are dropped locally without a request.
    pub async fn delete_item(&self, index: usize) -> Result<bool, ClientError> {
        let Some(entry) = self.core.data.read().get(index).cloned() else {
            return Ok(false);
        };
        if !self
            .core
            .ctx
            .confirm
            .confirm(&format!("Delete this {}?", I::LABEL))
        {
            return Ok(false);
        }

        let Some(id) = entry.id else {
            self.core.update(|entries| {
                if index < entries.len() {
                    entries.remove(index);
                }
            });
            return Ok(true);
        };

        let api = self.core.ctx.api().clone();
        let target = id.clone();
        self.core
            .mutate(
                async move { I::delete(&api, &target).await },
                |message| message.clone(),
                |entries, _| entries.retain(|e| e.id.as_deref() != Some(id.as_str())),
            )
            .await?;
        Ok(true)
    }
}

impl<I: ListItem> Drop for ListManager<I> {
    fn drop(&mut self) {
        self.core.unmount();
    }
}

pub type ProjectsManager = ListManager<Project>;
pub type LearningJourneyManager = ListManager<LearningPhase>;

// ============= Skills =============

#[derive(Debug, Clone, Default)]
struct SkillsDraft {
    categories: SkillsByCategory,
    /// Added here, not yet saved
    local_only: BTreeSet<String>,
}

pub struct SkillsManager {
    core: Arc<Managed<SkillsDraft>>,
    _registration: SaveRegistration,
}

impl SkillsManager {
    /// Registers a handler that saves every category, then loads.
    pub async fn mount(ctx: ManagerContext) -> Self {
        let session = Arc::clone(&ctx.session);
        let core = Managed::new(ctx, SkillsDraft::default());
        let registration =
            session.register_save_handler(save_handler(&core, |core| async move {
                Self::save_all_core(&core).await
            }));

        let manager = Self {
            core,
            _registration: registration,
        };
        let _ = manager.reload().await;
        manager
    }

    pub async fn reload(&self) -> Result<(), ClientError> {
        let api = self.core.ctx.api().clone();
        self.core
            .load("skills", async move {
                api.skills().await.map(|categories| SkillsDraft {
                    categories,
                    local_only: BTreeSet::new(),
                })
            })
            .await
    }

    pub fn state(&self) -> ManagerState {
        self.core.state()
    }

    pub fn categories(&self) -> SkillsByCategory {
        self.core.data.read().categories.clone()
    }

    pub fn skills(&self, category: &str) -> Option<Vec<Skill>> {
        self.core.data.read().categories.get(category).cloned()
    }

    /// Adds an empty category under its normalised key and returns the key.
    /// Blank names are refused.
    pub fn add_category(&self, name: &str) -> Option<String> {
        let key = normalize_category(name);
        if key.is_empty() {
            return None;
        }
        self.core.update(|draft| {
            if !draft.categories.contains_key(&key) {
                draft.categories.insert(key.clone(), Vec::new());
                draft.local_only.insert(key.clone());
            }
        })?;
        Some(key)
    }

    pub fn add_skill(&self, category: &str, skill: Skill) -> bool {
        self.core
            .update(|draft| match draft.categories.get_mut(category) {
                Some(skills) => {
                    skills.push(skill);
                    true
                }
                None => false,
            })
            .unwrap_or(false)
    }

    pub fn edit_skill(&self, category: &str, index: usize, f: impl FnOnce(&mut Skill)) -> bool {
        self.core
            .update(|draft| {
                match draft
                    .categories
                    .get_mut(category)
                    .and_then(|skills| skills.get_mut(index))
                {
                    Some(skill) => {
                        f(skill);
                        true
                    }
                    None => false,
                }
            })
            .unwrap_or(false)
    }

    pub fn remove_skill(&self, category: &str, index: usize) -> Option<Skill> {
        self.core
            .update(|draft| {
                let skills = draft.categories.get_mut(category)?;
                (index < skills.len()).then(|| skills.remove(index))
            })
            .flatten()
    }

    /// PUTs one category's skill list.
    pub async fn save_category(&self, category: &str) -> Result<(), ClientError> {
        Self::save_category_core(&self.core, category).await
    }

    async fn save_category_core(
        core: &Managed<SkillsDraft>,
        category: &str,
    ) -> Result<(), ClientError> {
        let Some(skills) = core.data.read().categories.get(category).cloned() else {
            return Err(ClientError::Rejected(format!(
                "Unknown skill category '{}'",
                category
            )));
        };

        let api = core.ctx.api().clone();
        let key = category.to_string();
        core.mutate(
            async move { api.update_skills(&key, &skills).await },
            |message| message.clone(),
            |draft, _| {
                draft.local_only.remove(category);
            },
        )
        .await
        .map(|_| ())
    }

    /// PUTs every category as one save: a single toast and a single summary
    /// refresh. Categories written before a failure stop counting as unsaved.
    pub async fn save_all(&self) -> Result<(), ClientError> {
        Self::save_all_core(&self.core).await
    }

    async fn save_all_core(core: &Managed<SkillsDraft>) -> Result<(), ClientError> {
        let categories: Vec<(String, Vec<Skill>)> = core
            .data
            .read()
            .categories
            .iter()
            .map(|(key, skills)| (key.clone(), skills.clone()))
            .collect();
        if categories.is_empty() {
            return Ok(());
        }

        let api = core.ctx.api().clone();
        let count = categories.len();
        core.mutate(
            async {
                for (category, skills) in &categories {
                    api.update_skills(category, skills).await?;
                    core.update(|draft| draft.local_only.remove(category));
                }
                Ok(())
            },
            |_| format!("Saved {} skill categories", count),
            |_, _| {},
        )
        .await
    }

    /// Removes a category after confirmation; unsaved ones go without a
    /// request.
    pub async fn delete_category(&self, category: &str) -> Result<bool, ClientError> {
        let (exists, local_only) = {
            let draft = self.core.data.read();
            (
                draft.categories.contains_key(category),
                draft.local_only.contains(category),
            )
        };
        if !exists {
            return Ok(false);
        }
        if !self
            .core
            .ctx
            .confirm
            .confirm(&format!("Delete the '{}' skill category?", category))
        {
            return Ok(false);
        }

        let remove = |draft: &mut SkillsDraft| {
            draft.categories.remove(category);
            draft.local_only.remove(category);
        };

        if local_only {
            self.core.update(remove);
            return Ok(true);
        }

        let api = self.core.ctx.api().clone();
        let key = category.to_string();
        self.core
            .mutate(
                async move { api.delete_skill_category(&key).await },
                |message| message.clone(),
                |draft, _| remove(draft),
            )
            .await?;
        Ok(true)
    }
}

impl Drop for SkillsManager {
    fn drop(&mut self) {
        self.core.unmount();
    }
}

// ============= Messages inbox =============

/// The contact-message inbox. It has nothing to save, so it registers no
/// handler.
pub struct MessagesManager {
    core: Arc<Managed<Vec<ContactMessage>>>,
}

impl MessagesManager {
    pub async fn mount(ctx: ManagerContext) -> Self {
        let manager = Self {
            core: Managed::new(ctx, Vec::new()),
        };
        let _ = manager.reload().await;
        manager
    }

    pub async fn reload(&self) -> Result<(), ClientError> {
        let api = self.core.ctx.api().clone();
        self.core
            .load("messages", async move { api.messages().await })
            .await
    }

    pub fn state(&self) -> ManagerState {
        self.core.state()
    }

    pub fn messages(&self) -> Vec<ContactMessage> {
        self.core.snapshot()
    }

    pub fn unread_count(&self) -> usize {
        self.core.data.read().iter().filter(|m| !m.read).count()
    }

    pub async fn mark_read(&self, id: &str) -> Result<(), ClientError> {
        let api = self.core.ctx.api().clone();
        let target = id.to_string();
        self.core
            .mutate(
                async move { api.mark_message_read(&target).await },
                |message| message.clone(),
                |messages, _| {
                    if let Some(m) = messages.iter_mut().find(|m| m.id == id) {
                        m.read = true;
                    }
                },
            )
            .await
            .map(|_| ())
    }

    /// Deletes a message after confirmation and drops it from the list.
    /// Returns false when the admin declined.
    pub async fn delete(&self, id: &str) -> Result<bool, ClientError> {
        if !self
            .core
            .ctx
            .confirm
            .confirm("Are you sure you want to delete this message?")
        {
            return Ok(false);
        }

        let api = self.core.ctx.api().clone();
        let target = id.to_string();
        self.core
            .mutate(
                async move { api.delete_message(&target).await },
                |message| message.clone(),
                |messages, _| messages.retain(|m| m.id != id),
            )
            .await?;
        Ok(true)
    }
}

impl Drop for MessagesManager {
    fn drop(&mut self) {
        self.core.unmount();
    }
}

// ============= Admin users =============

pub struct AdminUsersManager {
    core: Arc<Managed<Vec<AdminUser>>>,
}

impl AdminUsersManager {
    pub async fn mount(ctx: ManagerContext) -> Self {
        let manager = Self {
            core: Managed::new(ctx, Vec::new()),
        };
        let _ = manager.reload().await;
        manager
    }

    pub async fn reload(&self) -> Result<(), ClientError> {
        let api = self.core.ctx.api().clone();
        self.core
            .load("users", async move { api.admins().await })
            .await
    }

    pub fn state(&self) -> ManagerState {
        self.core.state()
    }

    pub fn admins(&self) -> Vec<AdminUser> {
        self.core.snapshot()
    }

    /// Creates an admin. Missing username, password or name is reported
    /// without a request.
    pub async fn create(&self, input: AdminCreate) -> Result<AdminUser, ClientError> {
        if let Err(field) = input.validate() {
            let e = ClientError::Validation {
                field: field.field,
                msg: field.msg,
            };
            self.core.ctx.notifier.error(&e.user_message());
            return Err(e);
        }

        let api = self.core.ctx.api().clone();
        self.core
            .mutate(
                async move { api.create_admin(&input).await },
                |admin| format!("Admin '{}' created", admin.username),
                |admins, admin| admins.push(admin.clone()),
            )
            .await
    }

    pub async fn delete(&self, username: &str) -> Result<bool, ClientError> {
        if !self
            .core
            .ctx
            .confirm
            .confirm(&format!("Delete admin '{}'?", username))
        {
            return Ok(false);
        }

        let api = self.core.ctx.api().clone();
        let target = username.to_string();
        self.core
            .mutate(
                async move { api.delete_admin(&target).await },
                |message| message.clone(),
                |admins, _| admins.retain(|a| a.username != username),
            )
            .await?;
        Ok(true)
    }
}

impl Drop for AdminUsersManager {
    fn drop(&mut self) {
        self.core.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::{ApiClient, TokenStore};
    use crate::types::{Footer, Profile};

    fn offline_ctx() -> ManagerContext {
        // Nothing listens on port 9
        let client = ApiClient::new("http://127.0.0.1:9", TokenStore::default()).unwrap();
        ManagerContext::new(AdminSession::new(AdminApi::new(client)))
    }

    #[tokio::test]
    async fn test_failed_load_enters_error_state() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|msg| msg.to_string() == "Network error - please check your connection")
            .times(1)
            .return_const(());
        let ctx = offline_ctx().with_notifier(Arc::new(notifier));

        let manager = DocumentManager::<Footer>::mount(ctx).await;

        assert_eq!(
            manager.state(),
            ManagerState::Error("Network error - please check your connection".into())
        );
        assert!(manager.data().is_none());
        assert!(!manager.edit(|footer| footer.set("tagline", "x")));
    }

    #[tokio::test]
    async fn test_mount_registers_and_unmount_clears_handler() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = offline_ctx().with_notifier(notifier);
        let session = Arc::clone(&ctx.session);

        let manager = DocumentManager::<Profile>::mount(ctx).await;
        assert!(session.is_save_visible());

        drop(manager);
        assert!(!session.is_save_visible());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_local_edits() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = offline_ctx().with_notifier(notifier.clone());
        let manager = DocumentManager::<Footer>::mount(ctx).await;

        // Simulate a successful load
        manager.core.update(|doc| *doc = Some(Footer::default()));
        manager.core.set_state(ManagerState::Ready);
        assert!(manager.edit(|footer| footer.set("tagline", "Built with care")));

        let result = manager.save().await;

        assert!(matches!(result, Err(ClientError::Network(_))));
        assert_eq!(manager.state(), ManagerState::Ready);
        assert_eq!(
            manager.data().unwrap().get("tagline"),
            Some(&serde_json::json!("Built with care"))
        );
        assert_eq!(
            notifier.last(),
            Some(Toast::Error("Network error - please check your connection".into()))
        );
    }

    #[tokio::test]
    async fn test_declined_confirm_sends_nothing() {
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().times(1).return_const(false);
        let ctx = offline_ctx()
            .with_notifier(Arc::new(RecordingNotifier::default()))
            .with_confirm(Arc::new(confirm));

        let manager = MessagesManager::mount(ctx).await;
        assert_eq!(manager.delete("42").await, Ok(false));
    }

    #[tokio::test]
    async fn test_unsaved_rows_and_categories_are_dropped_locally() {
        let ctx = offline_ctx().with_notifier(Arc::new(RecordingNotifier::default()));

        let projects = ProjectsManager::mount(ctx.clone()).await;
        let index = projects.add_draft().unwrap();
        assert!(projects.edit_item(index, |draft| draft.title = "Side project".into()));
        assert_eq!(projects.delete_item(index).await, Ok(true));
        assert!(projects.is_empty());
        drop(projects);

        let skills = SkillsManager::mount(ctx).await;
        assert_eq!(skills.add_category("  Cloud Platforms "), Some("cloud-platforms".into()));
        assert!(skills.add_skill("cloud-platforms", Skill::new("AWS", 40)));
        assert!(skills.edit_skill("cloud-platforms", 0, |s| s.proficiency = 60));
        assert_eq!(skills.skills("cloud-platforms").unwrap()[0].proficiency, 60);
        assert_eq!(skills.add_category("   "), None);
        assert_eq!(skills.delete_category("cloud-platforms").await, Ok(true));
        assert!(skills.categories().is_empty());
    }

    #[tokio::test]
    async fn test_admin_create_validates_before_request() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = offline_ctx().with_notifier(notifier.clone());
        let manager = AdminUsersManager::mount(ctx).await;

        let result = manager
            .create(AdminCreate {
                username: "editor".into(),
                password: "longenough".into(),
                name: String::new(),
                profile_image: String::new(),
            })
            .await;

        assert!(matches!(result, Err(ClientError::Validation { ref field, .. }) if field == "name"));
        assert_eq!(
            notifier.last(),
            Some(Toast::Error("Validation Error: field required for field 'name'".into()))
        );
    }

    #[test]
    fn test_new_phase_draft_is_ordered_last() {
        let draft = LearningPhase::new_draft(2);
        assert_eq!(draft.order, 3);
        assert_eq!(draft.status, "planned");
    }
}
