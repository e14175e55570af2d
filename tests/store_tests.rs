//! Store integration tests
//!
//! These tests verify the PortfolioStore functionality using in-memory SQLite
//! and, where persistence matters, a database file in a temp directory.

use folio::db::{seed, DatabaseProvider, PortfolioStore};
use folio::types::{
    AdminRole, AppError, ContactMessageCreate, Education, Footer, LearningPhaseDraft,
    NotificationKind, ProjectDraft, ProjectUpdate, Skill,
};
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

/// Test helper to create a store with an in-memory database
async fn create_test_store() -> PortfolioStore {
    PortfolioStore::new_memory()
        .await
        .expect("Failed to create in-memory store")
}

fn project_draft(title: &str) -> ProjectDraft {
    ProjectDraft {
        title: title.to_string(),
        description: format!("{} description", title),
        status: "coming-soon".to_string(),
        ..Default::default()
    }
}

fn message(name: &str) -> ContactMessageCreate {
    ContactMessageCreate {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        message: "Hello!".to_string(),
    }
}

#[rstest]
#[case(":memory:", true)]
#[case("", true)]
#[case("./data/folio.db", false)]
#[case("file:./data/folio.db", false)]
fn test_provider_from_url(#[case] url: &str, #[case] memory: bool) {
    let provider = DatabaseProvider::from_url(url);
    assert_eq!(matches!(provider, DatabaseProvider::Memory), memory);
}

#[tokio::test]
async fn test_file_store_persists_across_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("folio.db");
    let url = path.to_string_lossy().to_string();

    {
        let store = DatabaseProvider::from_url(&url).connect().await.unwrap();
        store.create_project(project_draft("Persisted")).await.unwrap();
    }

    let store = DatabaseProvider::from_url(&url).connect().await.unwrap();
    let projects = store.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Persisted");
}

// ============= Sections =============

#[tokio::test]
async fn test_missing_section_is_none() {
    let store = create_test_store().await;

    assert!(store.get_section::<Footer>().await.unwrap().is_none());
    assert!(store.get_section_value("footer").await.unwrap().is_none());
}

#[tokio::test]
async fn test_put_section_replaces_whole_document() {
    let store = create_test_store().await;

    let mut footer = Footer::default();
    footer.set("tagline", "First");
    footer.set("copyright", "2026");
    store.put_section(&footer).await.unwrap();

    let mut replacement = Footer::default();
    replacement.set("tagline", "Second");
    store.put_section(&replacement).await.unwrap();

    let stored = store.get_section::<Footer>().await.unwrap().unwrap();
    assert_eq!(stored.get("tagline"), Some(&json!("Second")));
    assert!(stored.get("copyright").is_none());
}

#[tokio::test]
async fn test_section_keeps_unknown_fields() {
    let store = create_test_store().await;

    let mut education: Education =
        serde_json::from_value(json!({ "degree": "BSc", "progress": 40, "honours": true }))
            .unwrap();
    education.institution = "State University".to_string();
    store.put_section(&education).await.unwrap();

    let value = store.get_section_value("education").await.unwrap().unwrap();
    assert_eq!(value["honours"], json!(true));
    assert_eq!(value["institution"], json!("State University"));
    assert_eq!(value["progress"], json!(40));
}

// ============= Skills =============

#[tokio::test]
async fn test_skill_category_upsert_and_delete() {
    let store = create_test_store().await;

    store
        .put_skill_category("tools", &[Skill::new("Git", 70)])
        .await
        .unwrap();
    store
        .put_skill_category("tools", &[Skill::new("Git", 90), Skill::new("Docker", 40)])
        .await
        .unwrap();

    let skills = store.get_skills().await.unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills["tools"].len(), 2);
    assert_eq!(skills["tools"][0].proficiency, 90);

    assert!(store.delete_skill_category("tools").await.unwrap());
    assert!(!store.delete_skill_category("tools").await.unwrap());
    assert!(store.get_skills().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_skill_categories_iterate_by_key() {
    let store = create_test_store().await;

    for category in ["soft", "cloud", "programming"] {
        store
            .put_skill_category(category, &[Skill::new("Any", 50)])
            .await
            .unwrap();
    }

    let keys: Vec<_> = store.get_skills().await.unwrap().into_keys().collect();
    assert_eq!(keys, vec!["cloud", "programming", "soft"]);
}

// ============= Projects =============

#[tokio::test]
async fn test_projects_listed_newest_first() {
    let store = create_test_store().await;

    store.create_project(project_draft("Older")).await.unwrap();
    store.create_project(project_draft("Newer")).await.unwrap();

    let titles: Vec<_> = store
        .list_projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
}

#[tokio::test]
async fn test_project_partial_update() {
    let store = create_test_store().await;
    let created = store.create_project(project_draft("Folio")).await.unwrap();

    let updated = store
        .update_project(
            &created.id,
            ProjectUpdate {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .expect("project should exist");

    assert_eq!(updated.status, "completed");
    assert_eq!(updated.title, "Folio");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let fetched = store.get_project(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_and_delete_missing_project() {
    let store = create_test_store().await;

    let update = ProjectUpdate {
        title: Some("Ghost".to_string()),
        ..Default::default()
    };
    assert!(store.update_project("missing", update).await.unwrap().is_none());
    assert!(!store.delete_project("missing").await.unwrap());
}

// ============= Learning journey =============

#[tokio::test]
async fn test_learning_phases_follow_order_field() {
    let store = create_test_store().await;

    for (phase, order) in [("Third", 3), ("First", 1), ("Second", 2)] {
        store
            .create_learning_phase(LearningPhaseDraft {
                phase: phase.to_string(),
                skills: vec![],
                status: "planned".to_string(),
                order,
            })
            .await
            .unwrap();
    }

    let phases = store.list_learning_phases().await.unwrap();
    let names: Vec<_> = phases.iter().map(|p| p.phase.as_str()).collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);

    // Moving a phase to the front reorders the list
    let third = phases[2].clone();
    store
        .update_learning_phase(
            &third.id,
            LearningPhaseDraft {
                phase: third.phase,
                skills: third.skills,
                status: "in-progress".to_string(),
                order: 0,
            },
        )
        .await
        .unwrap()
        .expect("phase should exist");

    let phases = store.list_learning_phases().await.unwrap();
    assert_eq!(phases[0].phase, "Third");
    assert_eq!(phases[0].status, "in-progress");
}

// ============= Messages and notifications =============

#[tokio::test]
async fn test_message_lifecycle() {
    let store = create_test_store().await;

    let created = store.create_message(message("Ada")).await.unwrap();
    assert!(!created.read);
    assert_eq!(store.list_messages().await.unwrap(), vec![created.clone()]);

    assert!(store.mark_message_read(&created.id).await.unwrap());
    assert!(store.list_messages().await.unwrap()[0].read);

    assert!(store.delete_message(&created.id).await.unwrap());
    assert!(!store.mark_message_read(&created.id).await.unwrap());
    assert!(store.list_messages().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_notifications_mark_all_and_clear() {
    let store = create_test_store().await;

    let first = store
        .create_notification(NotificationKind::Login, "Admin 'owner' logged in")
        .await
        .unwrap();
    store
        .create_notification(NotificationKind::NewMessage, "New message from Ada")
        .await
        .unwrap();

    let listed = store.list_notifications().await.unwrap();
    assert_eq!(listed.last(), Some(&first));

    assert!(store.mark_notification_read(&first.id).await.unwrap());
    assert_eq!(store.mark_all_notifications_read().await.unwrap(), 1);
    assert!(store
        .list_notifications()
        .await
        .unwrap()
        .iter()
        .all(|n| n.read));

    assert_eq!(store.clear_notifications().await.unwrap(), 2);
    assert!(store.list_notifications().await.unwrap().is_empty());
}

// ============= Admin users =============

#[tokio::test]
async fn test_create_duplicate_admin_fails() {
    let store = create_test_store().await;

    store
        .create_admin("editor", "hash", "Editor", "", AdminRole::Admin)
        .await
        .unwrap();
    let result = store
        .create_admin("editor", "hash", "Editor Again", "", AdminRole::Admin)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(store.list_admins().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_credentials_round_trip() {
    let store = create_test_store().await;

    let created = store
        .create_admin("owner", "argon-hash", "Owner", "/me.png", AdminRole::Owner)
        .await
        .unwrap();

    let (admin, hash) = store
        .get_admin_credentials("owner")
        .await
        .unwrap()
        .expect("admin should exist");
    assert_eq!(admin, created);
    assert_eq!(admin.role, AdminRole::Owner);
    assert_eq!(hash, "argon-hash");

    assert!(store.delete_admin("owner").await.unwrap());
    assert!(store.get_admin("owner").await.unwrap().is_none());
}

// ============= Dashboard =============

#[tokio::test]
async fn test_dashboard_summary_counts() {
    let store = create_test_store().await;
    seed::seed_portfolio(&store).await.unwrap();

    for name in ["A", "B", "C", "D", "E", "F"] {
        store.create_message(message(name)).await.unwrap();
    }
    let newest = store.list_messages().await.unwrap()[0].clone();
    store.mark_message_read(&newest.id).await.unwrap();
    store
        .create_notification(NotificationKind::AdminCreated, "Admin 'x' created")
        .await
        .unwrap();

    let summary = store.dashboard_summary().await.unwrap();

    assert_eq!(summary.project_count, 2);
    assert_eq!(summary.skill_category_count, 7);
    assert_eq!(summary.message_count, 6);
    assert_eq!(summary.unread_message_count, 5);
    assert_eq!(summary.unread_notification_count, 1);
    assert_eq!(summary.recent_messages.len(), 5);
    assert_eq!(summary.recent_messages[0].id, newest.id);
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let store = create_test_store().await;

    assert!(seed::seed_portfolio(&store).await.unwrap());
    assert!(!seed::seed_portfolio(&store).await.unwrap());

    assert_eq!(store.list_projects().await.unwrap().len(), 2);
    assert!(store.get_section::<Footer>().await.unwrap().is_some());
}
