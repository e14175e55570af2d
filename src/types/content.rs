use super::FieldError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A section persisted as one whole document.
///
/// `KEY` is both the storage key and the URL segment: the public read lives at
/// `/api/{KEY}` and the admin write at `/api/admin/{KEY}`.
pub trait SectionDocument:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    const KEY: &'static str;
    const LABEL: &'static str;

    /// Shape checks beyond what deserialization already enforces.
    fn validate(&self) -> Result<(), FieldError> {
        Ok(())
    }
}

fn default_location() -> String {
    "Odisha, India".to_string()
}

// ============= Profile =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub highlights: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    /// Fields the admin panel adds that the server stores verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            headline: String::new(),
            bio: String::new(),
            highlights: String::new(),
            profile_image: String::new(),
            email: String::new(),
            linkedin: String::new(),
            location: default_location(),
            resume_url: None,
            extra: Map::new(),
        }
    }
}

impl SectionDocument for Profile {
    const KEY: &'static str = "profile";
    const LABEL: &'static str = "Profile";

    fn validate(&self) -> Result<(), FieldError> {
        if self.name.trim().is_empty() {
            return Err(FieldError::new("name", "field required"));
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(FieldError::new("email", "value is not a valid email address"));
        }
        Ok(())
    }
}

// ============= Education =============

fn default_progress() -> u8 {
    75
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: String,
    /// Completion percentage
    #[serde(default = "default_progress")]
    pub progress: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Education {
    fn default() -> Self {
        Self {
            degree: String::new(),
            institution: String::new(),
            year: String::new(),
            progress: default_progress(),
            extra: Map::new(),
        }
    }
}

impl SectionDocument for Education {
    const KEY: &'static str = "education";
    const LABEL: &'static str = "Education";

    fn validate(&self) -> Result<(), FieldError> {
        if self.progress > 100 {
            return Err(FieldError::new(
                "progress",
                "ensure this value is less than or equal to 100",
            ));
        }
        Ok(())
    }
}

// ============= Free-form sections =============

macro_rules! free_form_section {
    ($(#[$doc:meta])* $name:ident, $key:literal, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Map<String, Value>);

        impl $name {
            pub fn get(&self, field: &str) -> Option<&Value> {
                self.0.get(field)
            }

            pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
                self.0.insert(field.into(), value.into());
            }
        }

        impl SectionDocument for $name {
            const KEY: &'static str = $key;
            const LABEL: &'static str = $label;
        }
    };
}

free_form_section!(
    /// Experience blurb and goals list.
    Experience,
    "experience",
    "Experience"
);
free_form_section!(
    /// Title and quote shown beside the learning journey.
    GrowthMindset,
    "growth-mindset",
    "Growth mindset"
);
free_form_section!(
    /// Experiments header and its item lists.
    Experiments,
    "experiments",
    "Experiments"
);
free_form_section!(
    /// Contact section copy and `contact_links`.
    ContactSection,
    "contact-section",
    "Contact section"
);
free_form_section!(
    /// Footer copy and `quick_links`.
    Footer,
    "footer",
    "Footer"
);

// ============= Skills =============

fn default_proficiency() -> u8 {
    50
}

/// One skill inside a category. Older records store bare names; those read
/// back with the default proficiency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SkillRepr")]
pub struct Skill {
    pub name: String,
    pub proficiency: u8,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default = "default_proficiency")]
        proficiency: u8,
    },
}

impl From<SkillRepr> for Skill {
    fn from(repr: SkillRepr) -> Self {
        match repr {
            SkillRepr::Name(name) => Skill {
                name,
                proficiency: default_proficiency(),
            },
            SkillRepr::Full { name, proficiency } => Skill { name, proficiency },
        }
    }
}

impl Skill {
    pub fn new(name: impl Into<String>, proficiency: u8) -> Self {
        Self {
            name: name.into(),
            proficiency,
        }
    }
}

impl Default for Skill {
    fn default() -> Self {
        Self::new("New Skill", default_proficiency())
    }
}

/// Skills per category, iterated in category-key order.
pub type SkillsByCategory = BTreeMap<String, Vec<Skill>>;

/// Body of `PUT /admin/skills/{category}`: either the bare list or
/// `{"skills": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsPayload {
    List(Vec<Skill>),
    Wrapped { skills: Vec<Skill> },
}

impl SkillsPayload {
    pub fn into_skills(self) -> Vec<Skill> {
        match self {
            SkillsPayload::List(skills) | SkillsPayload::Wrapped { skills } => skills,
        }
    }
}

/// Lowercases a category name and joins whitespace runs with `-`.
pub fn normalize_category(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn validate_skills(skills: &[Skill]) -> Result<(), FieldError> {
    for skill in skills {
        if skill.name.trim().is_empty() {
            return Err(FieldError::new("name", "skill name must not be empty"));
        }
        if skill.proficiency > 100 {
            return Err(FieldError::new(
                "proficiency",
                "ensure this value is less than or equal to 100",
            ));
        }
    }
    Ok(())
}

// ============= Projects =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// e.g. `completed`, `coming-soon`
    pub status: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "liveUrl", default)]
    pub live_url: Option<String>,
    #[serde(rename = "githubUrl", default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "liveUrl", default)]
    pub live_url: Option<String>,
    #[serde(rename = "githubUrl", default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.title.trim().is_empty() {
            return Err(FieldError::new("title", "field required"));
        }
        if self.status.trim().is_empty() {
            return Err(FieldError::new("status", "field required"));
        }
        Ok(())
    }
}

impl From<&Project> for ProjectDraft {
    fn from(p: &Project) -> Self {
        Self {
            title: p.title.clone(),
            description: p.description.clone(),
            status: p.status.clone(),
            image: p.image.clone(),
            live_url: p.live_url.clone(),
            github_url: p.github_url.clone(),
            technologies: p.technologies.clone(),
        }
    }
}

/// Partial project update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "liveUrl", default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(rename = "githubUrl", default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProjectUpdate::default()
    }

    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(image) = self.image {
            project.image = image;
        }
        if self.live_url.is_some() {
            project.live_url = self.live_url;
        }
        if self.github_url.is_some() {
            project.github_url = self.github_url;
        }
        if let Some(technologies) = self.technologies {
            project.technologies = technologies;
        }
    }
}

impl From<ProjectDraft> for ProjectUpdate {
    fn from(d: ProjectDraft) -> Self {
        Self {
            title: Some(d.title),
            description: Some(d.description),
            status: Some(d.status),
            image: Some(d.image),
            live_url: d.live_url,
            github_url: d.github_url,
            technologies: Some(d.technologies),
        }
    }
}

// ============= Learning Journey =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPhase {
    pub id: String,
    pub phase: String,
    #[serde(default)]
    pub skills: Vec<String>,
    /// `completed`, `in-progress` or `planned`
    pub status: String,
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningPhaseDraft {
    pub phase: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub status: String,
    pub order: i64,
}

impl LearningPhaseDraft {
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.phase.trim().is_empty() {
            return Err(FieldError::new("phase", "field required"));
        }
        match self.status.as_str() {
            "completed" | "in-progress" | "planned" => Ok(()),
            _ => Err(FieldError::new(
                "status",
                "must be one of completed, in-progress, planned",
            )),
        }
    }
}

impl From<&LearningPhase> for LearningPhaseDraft {
    fn from(p: &LearningPhase) -> Self {
        Self {
            phase: p.phase.clone(),
            skills: p.skills.clone(),
            status: p.status.clone(),
            order: p.order,
        }
    }
}

/// Splits the comma-separated skills text the phase editor works with.
pub fn split_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============= Messages & Notifications =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMessageCreate {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessageCreate {
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.name.trim().is_empty() {
            return Err(FieldError::new("name", "field required"));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') || email.starts_with('@') {
            return Err(FieldError::new("email", "value is not a valid email address"));
        }
        if self.message.trim().is_empty() {
            return Err(FieldError::new("message", "field required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewMessage,
    Login,
    Logout,
    AdminCreated,
    AdminDeleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewMessage => "new_message",
            NotificationKind::Login => "login",
            NotificationKind::Logout => "logout",
            NotificationKind::AdminCreated => "admin_created",
            NotificationKind::AdminDeleted => "admin_deleted",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "new_message" => Some(NotificationKind::NewMessage),
            "login" => Some(NotificationKind::Login),
            "logout" => Some(NotificationKind::Logout),
            "admin_created" => Some(NotificationKind::AdminCreated),
            "admin_deleted" => Some(NotificationKind::AdminDeleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

// ============= Admin Users =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    /// The bootstrap account; cannot be deleted
    Owner,
    Admin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Owner => "owner",
            AdminRole::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Self {
        if raw == "owner" {
            AdminRole::Owner
        } else {
            AdminRole::Admin
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image: String,
    pub role: AdminRole,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminCreate {
    pub username: String,
    pub password: String,
    pub name: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image: String,
}

impl AdminCreate {
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.username.trim().is_empty() {
            return Err(FieldError::new("username", "field required"));
        }
        if self.name.trim().is_empty() {
            return Err(FieldError::new("name", "field required"));
        }
        if self.password.len() < 8 {
            return Err(FieldError::new(
                "password",
                "ensure this value has at least 8 characters",
            ));
        }
        Ok(())
    }
}

// ============= Dashboard & Search =============

/// Counts shown on the dashboard and in the header badges. Missing counts
/// read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub project_count: u64,
    pub message_count: u64,
    pub unread_message_count: u64,
    pub skill_category_count: u64,
    pub unread_notification_count: u64,
    pub recent_messages: Vec<ContactMessage>,
}

/// Matches grouped per section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub profile: Vec<Value>,
    #[serde(default)]
    pub projects: Vec<Value>,
    #[serde(default)]
    pub skills: Vec<Value>,
    #[serde(default)]
    pub education: Vec<Value>,
    #[serde(default)]
    pub experience: Vec<Value>,
    #[serde(default)]
    pub learning_journey: Vec<Value>,
    #[serde(default)]
    pub growth_mindset: Vec<Value>,
    #[serde(default)]
    pub experiments: Vec<Value>,
    #[serde(default)]
    pub contact: Vec<Value>,
    #[serde(default)]
    pub footer: Vec<Value>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
            && self.projects.is_empty()
            && self.skills.is_empty()
            && self.education.is_empty()
            && self.experience.is_empty()
            && self.learning_journey.is_empty()
            && self.growth_mindset.is_empty()
            && self.experiments.is_empty()
            && self.contact.is_empty()
            && self.footer.is_empty()
    }
}
