use crate::types::{
    AdminRole, AdminUser, AppError, ContactMessage, ContactMessageCreate, DashboardSummary,
    LearningPhase, LearningPhaseDraft, Notification, NotificationKind, Project, ProjectDraft,
    ProjectUpdate, Result, SectionDocument, Skill, SkillsByCategory,
};
use chrono::{DateTime, SubsecRound, Utc};
use libsql::{Builder, Connection, Database};
use serde_json::Value;
use uuid::Uuid;

/// Messages shown in the dashboard's "recent" list.
const RECENT_MESSAGE_LIMIT: usize = 5;

/// Relational store for every piece of portfolio content, backed by libsql.
///
/// One connection is opened at construction and shared; that keeps `:memory:`
/// databases alive for the lifetime of the store.
pub struct PortfolioStore {
    _db: Database,
    conn: Connection,
}

fn db_err(context: &'static str) -> impl Fn(libsql::Error) -> AppError {
    move |e| AppError::Database(format!("{}: {}", context, e))
}

/// Current time at the millisecond precision the timestamp columns hold.
fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp: {}", ms)))
}

fn decode_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| AppError::Database(format!("Corrupt record: {}", e)))
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| AppError::Internal(e.to_string()))
}

impl PortfolioStore {
    /// Opens an in-memory database; contents vanish with the store.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    /// Opens (or creates) a local SQLite file.
    pub async fn new_local(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Database(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(db_err("Failed to open database"))?;
        let conn = db.connect().map_err(db_err("Failed to get connection"))?;

        let store = Self { _db: db, conn };
        store.initialize_schema().await?;

        Ok(store)
    }

    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        let statements = [
            (
                "sections",
                "CREATE TABLE IF NOT EXISTS sections (
                    key TEXT PRIMARY KEY,
                    body TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
            ),
            (
                "skill_categories",
                "CREATE TABLE IF NOT EXISTS skill_categories (
                    category TEXT PRIMARY KEY,
                    skills TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
            ),
            (
                "projects",
                "CREATE TABLE IF NOT EXISTS projects (
                    id TEXT PRIMARY KEY,
                    body TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                )",
            ),
            (
                "learning_phases",
                "CREATE TABLE IF NOT EXISTS learning_phases (
                    id TEXT PRIMARY KEY,
                    body TEXT NOT NULL,
                    sort_order INTEGER NOT NULL
                )",
            ),
            (
                "messages",
                "CREATE TABLE IF NOT EXISTS messages (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    message TEXT NOT NULL,
                    read INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL
                )",
            ),
            (
                "notifications",
                "CREATE TABLE IF NOT EXISTS notifications (
                    id TEXT PRIMARY KEY,
                    kind TEXT NOT NULL,
                    message TEXT NOT NULL,
                    read INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL
                )",
            ),
            (
                "admins",
                "CREATE TABLE IF NOT EXISTS admins (
                    id TEXT PRIMARY KEY,
                    username TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    name TEXT NOT NULL,
                    profile_image TEXT NOT NULL,
                    role TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                )",
            ),
        ];

        for (table, sql) in statements {
            conn.execute(sql, ()).await.map_err(|e| {
                AppError::Database(format!("Failed to create {} table: {}", table, e))
            })?;
        }

        Ok(())
    }

    // ============== Whole-document sections ==============

    pub async fn get_section_value(&self, key: &str) -> Result<Option<Value>> {
        let mut rows = self
            .conn
            .query("SELECT body FROM sections WHERE key = ?", [key])
            .await
            .map_err(db_err("Failed to query section"))?;

        match rows.next().await.map_err(db_err("Failed to read section"))? {
            Some(row) => {
                let body: String = row.get(0).map_err(db_err("Failed to read section"))?;
                Ok(Some(decode_json(&body)?))
            }
            None => Ok(None),
        }
    }

    pub async fn get_section<S: SectionDocument>(&self) -> Result<Option<S>> {
        match self.get_section_value(S::KEY).await? {
            Some(value) => Ok(Some(serde_json::from_value(value).map_err(|e| {
                AppError::Database(format!("Corrupt {} record: {}", S::KEY, e))
            })?)),
            None => Ok(None),
        }
    }

    pub async fn put_section<S: SectionDocument>(&self, section: &S) -> Result<()> {
        let body = encode_json(section)?;
        self.conn
            .execute(
                "INSERT INTO sections (key, body, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
                (S::KEY, body, Utc::now().timestamp_millis()),
            )
            .await
            .map_err(db_err("Failed to store section"))?;

        Ok(())
    }

    // ============== Skills ==============

    pub async fn get_skills(&self) -> Result<SkillsByCategory> {
        let mut rows = self
            .conn
            .query(
                "SELECT category, skills FROM skill_categories ORDER BY category ASC",
                (),
            )
            .await
            .map_err(db_err("Failed to query skills"))?;

        let mut skills = SkillsByCategory::new();
        while let Some(row) = rows.next().await.map_err(db_err("Failed to read skills"))? {
            let category: String = row.get(0).map_err(db_err("Failed to read skills"))?;
            let body: String = row.get(1).map_err(db_err("Failed to read skills"))?;
            skills.insert(category, decode_json(&body)?);
        }

        Ok(skills)
    }

    /// Replaces a category's skill list, creating the category if new.
    pub async fn put_skill_category(&self, category: &str, skills: &[Skill]) -> Result<()> {
        let body = encode_json(&skills)?;
        self.conn
            .execute(
                "INSERT INTO skill_categories (category, skills, updated_at)
                 VALUES (?, ?, ?)
                 ON CONFLICT(category) DO UPDATE SET skills = excluded.skills, updated_at = excluded.updated_at",
                (category, body, Utc::now().timestamp_millis()),
            )
            .await
            .map_err(db_err("Failed to store skills"))?;

        Ok(())
    }

    pub async fn delete_skill_category(&self, category: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM skill_categories WHERE category = ?", [category])
            .await
            .map_err(db_err("Failed to delete skill category"))?;

        Ok(affected > 0)
    }

    // ============== Projects ==============

    /// All projects, newest first.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut rows = self
            .conn
            .query(
                "SELECT body FROM projects ORDER BY created_at DESC, rowid DESC",
                (),
            )
            .await
            .map_err(db_err("Failed to query projects"))?;

        let mut projects = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err("Failed to read projects"))? {
            let body: String = row.get(0).map_err(db_err("Failed to read projects"))?;
            projects.push(decode_json(&body)?);
        }

        Ok(projects)
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let mut rows = self
            .conn
            .query("SELECT body FROM projects WHERE id = ?", [id])
            .await
            .map_err(db_err("Failed to query project"))?;

        match rows.next().await.map_err(db_err("Failed to read project"))? {
            Some(row) => {
                let body: String = row.get(0).map_err(db_err("Failed to read project"))?;
                Ok(Some(decode_json(&body)?))
            }
            None => Ok(None),
        }
    }

    pub async fn create_project(&self, draft: ProjectDraft) -> Result<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            image: draft.image,
            live_url: draft.live_url,
            github_url: draft.github_url,
            technologies: draft.technologies,
            created_at: now,
            updated_at: now,
        };

        self.conn
            .execute(
                "INSERT INTO projects (id, body, created_at) VALUES (?, ?, ?)",
                (
                    project.id.as_str(),
                    encode_json(&project)?,
                    now.timestamp_millis(),
                ),
            )
            .await
            .map_err(db_err("Failed to create project"))?;

        Ok(project)
    }

    /// Applies a partial update; `None` when the project does not exist.
    pub async fn update_project(&self, id: &str, update: ProjectUpdate) -> Result<Option<Project>> {
        let Some(mut project) = self.get_project(id).await? else {
            return Ok(None);
        };

        update.apply(&mut project);
        project.updated_at = Utc::now();

        self.conn
            .execute(
                "UPDATE projects SET body = ? WHERE id = ?",
                (encode_json(&project)?, id),
            )
            .await
            .map_err(db_err("Failed to update project"))?;

        Ok(Some(project))
    }

    pub async fn delete_project(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?", [id])
            .await
            .map_err(db_err("Failed to delete project"))?;

        Ok(affected > 0)
    }

    // ============== Learning journey ==============

    /// All phases ordered by their `order` field.
    pub async fn list_learning_phases(&self) -> Result<Vec<LearningPhase>> {
        let mut rows = self
            .conn
            .query(
                "SELECT body FROM learning_phases ORDER BY sort_order ASC, rowid ASC",
                (),
            )
            .await
            .map_err(db_err("Failed to query learning journey"))?;

        let mut phases = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(db_err("Failed to read learning journey"))?
        {
            let body: String = row.get(0).map_err(db_err("Failed to read learning journey"))?;
            phases.push(decode_json(&body)?);
        }

        Ok(phases)
    }

    pub async fn create_learning_phase(&self, draft: LearningPhaseDraft) -> Result<LearningPhase> {
        let phase = LearningPhase {
            id: Uuid::new_v4().to_string(),
            phase: draft.phase,
            skills: draft.skills,
            status: draft.status,
            order: draft.order,
        };

        self.conn
            .execute(
                "INSERT INTO learning_phases (id, body, sort_order) VALUES (?, ?, ?)",
                (phase.id.as_str(), encode_json(&phase)?, phase.order),
            )
            .await
            .map_err(db_err("Failed to create learning phase"))?;

        Ok(phase)
    }

    pub async fn update_learning_phase(
        &self,
        id: &str,
        draft: LearningPhaseDraft,
    ) -> Result<Option<LearningPhase>> {
        let phase = LearningPhase {
            id: id.to_string(),
            phase: draft.phase,
            skills: draft.skills,
            status: draft.status,
            order: draft.order,
        };

        let affected = self
            .conn
            .execute(
                "UPDATE learning_phases SET body = ?, sort_order = ? WHERE id = ?",
                (encode_json(&phase)?, phase.order, id),
            )
            .await
            .map_err(db_err("Failed to update learning phase"))?;

        Ok((affected > 0).then_some(phase))
    }

    pub async fn delete_learning_phase(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM learning_phases WHERE id = ?", [id])
            .await
            .map_err(db_err("Failed to delete learning phase"))?;

        Ok(affected > 0)
    }

    // ============== Contact messages ==============

    pub async fn create_message(&self, input: ContactMessageCreate) -> Result<ContactMessage> {
        let message = ContactMessage {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            message: input.message,
            read: false,
            created_at: now_millis(),
        };

        self.conn
            .execute(
                "INSERT INTO messages (id, name, email, message, read, created_at)
                 VALUES (?, ?, ?, ?, 0, ?)",
                (
                    message.id.as_str(),
                    message.name.as_str(),
                    message.email.as_str(),
                    message.message.as_str(),
                    message.created_at.timestamp_millis(),
                ),
            )
            .await
            .map_err(db_err("Failed to create message"))?;

        Ok(message)
    }

    /// All messages, newest first.
    pub async fn list_messages(&self) -> Result<Vec<ContactMessage>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, name, email, message, read, created_at FROM messages
                 ORDER BY created_at DESC, rowid DESC",
                (),
            )
            .await
            .map_err(db_err("Failed to query messages"))?;

        let mut messages = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err("Failed to read messages"))? {
            messages.push(ContactMessage {
                id: row.get(0).map_err(db_err("Failed to read messages"))?,
                name: row.get(1).map_err(db_err("Failed to read messages"))?,
                email: row.get(2).map_err(db_err("Failed to read messages"))?,
                message: row.get(3).map_err(db_err("Failed to read messages"))?,
                read: row.get::<i64>(4).map_err(db_err("Failed to read messages"))? != 0,
                created_at: millis_to_datetime(
                    row.get::<i64>(5).map_err(db_err("Failed to read messages"))?,
                )?,
            });
        }

        Ok(messages)
    }

    pub async fn mark_message_read(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("UPDATE messages SET read = 1 WHERE id = ?", [id])
            .await
            .map_err(db_err("Failed to update message"))?;

        Ok(affected > 0)
    }

    pub async fn delete_message(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM messages WHERE id = ?", [id])
            .await
            .map_err(db_err("Failed to delete message"))?;

        Ok(affected > 0)
    }

    // ============== Notifications ==============

    pub async fn create_notification(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            kind,
            message: message.into(),
            read: false,
            created_at: now_millis(),
        };

        self.conn
            .execute(
                "INSERT INTO notifications (id, kind, message, read, created_at)
                 VALUES (?, ?, ?, 0, ?)",
                (
                    notification.id.as_str(),
                    kind.as_str(),
                    notification.message.as_str(),
                    notification.created_at.timestamp_millis(),
                ),
            )
            .await
            .map_err(db_err("Failed to create notification"))?;

        Ok(notification)
    }

    /// All notifications, newest first.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, kind, message, read, created_at FROM notifications
                 ORDER BY created_at DESC, rowid DESC",
                (),
            )
            .await
            .map_err(db_err("Failed to query notifications"))?;

        let mut notifications = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(db_err("Failed to read notifications"))?
        {
            let kind: String = row.get(1).map_err(db_err("Failed to read notifications"))?;
            let kind = NotificationKind::parse(&kind)
                .ok_or_else(|| AppError::Database(format!("Unknown notification kind: {}", kind)))?;

            notifications.push(Notification {
                id: row.get(0).map_err(db_err("Failed to read notifications"))?,
                kind,
                message: row.get(2).map_err(db_err("Failed to read notifications"))?,
                read: row.get::<i64>(3).map_err(db_err("Failed to read notifications"))? != 0,
                created_at: millis_to_datetime(
                    row.get::<i64>(4)
                        .map_err(db_err("Failed to read notifications"))?,
                )?,
            });
        }

        Ok(notifications)
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("UPDATE notifications SET read = 1 WHERE id = ?", [id])
            .await
            .map_err(db_err("Failed to update notification"))?;

        Ok(affected > 0)
    }

    /// Returns how many notifications flipped to read.
    pub async fn mark_all_notifications_read(&self) -> Result<u64> {
        self.conn
            .execute("UPDATE notifications SET read = 1 WHERE read = 0", ())
            .await
            .map_err(db_err("Failed to update notifications"))
    }

    pub async fn clear_notifications(&self) -> Result<u64> {
        self.conn
            .execute("DELETE FROM notifications", ())
            .await
            .map_err(db_err("Failed to clear notifications"))
    }

    // ============== Admin users ==============

    pub async fn create_admin(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
        profile_image: &str,
        role: AdminRole,
    ) -> Result<AdminUser> {
        if self.get_admin_credentials(username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Admin '{}' already exists",
                username
            )));
        }

        let admin = AdminUser {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            name: name.to_string(),
            profile_image: profile_image.to_string(),
            role,
            created_at: now_millis(),
        };

        self.conn
            .execute(
                "INSERT INTO admins (id, username, password_hash, name, profile_image, role, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                (
                    admin.id.as_str(),
                    username,
                    password_hash,
                    name,
                    profile_image,
                    role.as_str(),
                    admin.created_at.timestamp_millis(),
                ),
            )
            .await
            .map_err(db_err("Failed to create admin"))?;

        Ok(admin)
    }

    /// The admin record together with its password hash.
    pub async fn get_admin_credentials(&self, username: &str) -> Result<Option<(AdminUser, String)>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, username, name, profile_image, role, created_at, password_hash
                 FROM admins WHERE username = ?",
                [username],
            )
            .await
            .map_err(db_err("Failed to query admin"))?;

        match rows.next().await.map_err(db_err("Failed to read admin"))? {
            Some(row) => {
                let admin = Self::admin_from_row(&row)?;
                let hash: String = row.get(6).map_err(db_err("Failed to read admin"))?;
                Ok(Some((admin, hash)))
            }
            None => Ok(None),
        }
    }

    pub async fn get_admin(&self, username: &str) -> Result<Option<AdminUser>> {
        Ok(self
            .get_admin_credentials(username)
            .await?
            .map(|(admin, _)| admin))
    }

    pub async fn list_admins(&self) -> Result<Vec<AdminUser>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, username, name, profile_image, role, created_at
                 FROM admins ORDER BY created_at ASC, rowid ASC",
                (),
            )
            .await
            .map_err(db_err("Failed to query admins"))?;

        let mut admins = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err("Failed to read admins"))? {
            admins.push(Self::admin_from_row(&row)?);
        }

        Ok(admins)
    }

    pub async fn delete_admin(&self, username: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM admins WHERE username = ?", [username])
            .await
            .map_err(db_err("Failed to delete admin"))?;

        Ok(affected > 0)
    }

    fn admin_from_row(row: &libsql::Row) -> Result<AdminUser> {
        let role: String = row.get(4).map_err(db_err("Failed to read admin"))?;
        Ok(AdminUser {
            id: row.get(0).map_err(db_err("Failed to read admin"))?,
            username: row.get(1).map_err(db_err("Failed to read admin"))?,
            name: row.get(2).map_err(db_err("Failed to read admin"))?,
            profile_image: row.get(3).map_err(db_err("Failed to read admin"))?,
            role: AdminRole::parse(&role),
            created_at: millis_to_datetime(
                row.get::<i64>(5).map_err(db_err("Failed to read admin"))?,
            )?,
        })
    }

    // ============== Dashboard ==============

    async fn count(&self, sql: &str) -> Result<u64> {
        let mut rows = self
            .conn
            .query(sql, ())
            .await
            .map_err(db_err("Failed to count rows"))?;

        match rows.next().await.map_err(db_err("Failed to count rows"))? {
            Some(row) => Ok(row.get::<i64>(0).map_err(db_err("Failed to count rows"))? as u64),
            None => Ok(0),
        }
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let mut recent_messages = self.list_messages().await?;
        recent_messages.truncate(RECENT_MESSAGE_LIMIT);

        Ok(DashboardSummary {
            project_count: self.count("SELECT COUNT(*) FROM projects").await?,
            message_count: self.count("SELECT COUNT(*) FROM messages").await?,
            unread_message_count: self
                .count("SELECT COUNT(*) FROM messages WHERE read = 0")
                .await?,
            skill_category_count: self.count("SELECT COUNT(*) FROM skill_categories").await?,
            unread_notification_count: self
                .count("SELECT COUNT(*) FROM notifications WHERE read = 0")
                .await?,
            recent_messages,
        })
    }
}
