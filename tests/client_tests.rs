mod common;

use folio::client::{
    enter_admin_area, mock, AdminApi, AdminSession, ApiClient, ClientError, DocumentManager,
    GuardDecision, ManagerContext, ManagerState, MessagesManager, ProjectsManager, PublicApi,
    RecordingNotifier, SaveOutcome, SkillsManager, Toast, TokenStore, LOGIN_PATH,
};
use folio::types::{Footer, Skill};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn admin_api(origin: &str, token: Option<&str>) -> AdminApi {
    let tokens = TokenStore::default();
    if let Some(token) = token {
        tokens.set(token);
    }
    AdminApi::new(ApiClient::new(origin, tokens).expect("client should build"))
}

fn summary_body(unread_messages: u64, unread_notifications: u64) -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "unread_message_count": unread_messages,
            "unread_notification_count": unread_notifications
        }
    })
}

async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    tokio::time::timeout(Duration::from_secs(3), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}

// ============= Request pipeline =============

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/messages"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "total": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = admin_api(&server.uri(), Some("tok-123"));
    let messages = api.messages().await.expect("request should succeed");

    assert!(messages.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn test_unauthorized_response_clears_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "detail": "Invalid token"
        })))
        .mount(&server)
        .await;

    let api = admin_api(&server.uri(), Some("stale"));
    let result = api.messages().await;

    assert_eq!(result, Err(ClientError::Unauthorized("Invalid token".into())));
    assert!(!api.is_authenticated());

    // The next protected navigation goes to login without a request
    let before = server.received_requests().await.unwrap().len();
    let entered = enter_admin_area(&api, "/admin/messages", Duration::from_secs(3)).await;
    assert!(matches!(entered, Err(GuardDecision::Redirect(LOGIN_PATH))));
    assert_eq!(server.received_requests().await.unwrap().len(), before);
}

#[tokio::test]
async fn test_unauthenticated_dashboard_redirects_without_requests() {
    let server = MockServer::start().await;
    let api = admin_api(&server.uri(), None);

    let entered = enter_admin_area(&api, "/admin/dashboard", Duration::from_secs(3)).await;

    assert!(matches!(entered, Err(GuardDecision::Redirect(path)) if path == "/admin/login"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_error_is_normalised() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/skills/tools"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "detail": [{
                "loc": ["body", "proficiency"],
                "msg": "ensure this value is less than or equal to 100",
                "type": "value_error"
            }]
        })))
        .mount(&server)
        .await;

    let api = admin_api(&server.uri(), Some("tok"));
    let err = api
        .update_skills("tools", &[Skill::new("Git", 120)])
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "Validation Error: ensure this value is less than or equal to 100 for field 'proficiency'"
    );
    assert!(api.is_authenticated());
}

// ============= Public fetch fallback =============

#[tokio::test]
async fn test_profile_network_failure_falls_back_to_mock() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let public = PublicApi::new(ApiClient::new(&origin, TokenStore::default()).unwrap());
    let profile = public.profile_or_mock().await;

    let expected = mock::profile();
    assert_eq!(profile.name, expected.name);
    assert_eq!(profile.bio, expected.bio);
}

#[tokio::test]
async fn test_public_fetch_prefers_live_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": "p-1",
                "title": "Live project",
                "description": "From the server",
                "status": "completed",
                "createdAt": "2026-01-01T00:00:00Z",
                "updatedAt": "2026-01-01T00:00:00Z"
            }],
            "total": 1
        })))
        .mount(&server)
        .await;

    let public = PublicApi::new(ApiClient::new(&server.uri(), TokenStore::default()).unwrap());

    let projects = public.projects_or_mock().await;
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Live project");

    // No footer mock: the server answers 404, so the bundled footer is used
    assert_eq!(public.footer_or_mock().await, mock::footer());
}

// ============= Summary poller =============

#[tokio::test]
async fn test_poller_updates_badges_and_follows_later_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(3, 5)))
        .mount(&server)
        .await;

    let session = AdminSession::new(admin_api(&server.uri(), Some("tok")));
    let poller = session.mount(Duration::from_millis(50)).await;

    assert!(poller.is_running());
    assert_eq!(session.unread_message_count(), 3);
    assert_eq!(session.unread_notif_count(), 5);

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(4, 0)))
        .mount(&server)
        .await;

    assert!(wait_until(|| session.unread_message_count() == 4).await);
    assert_eq!(session.unread_notif_count(), 0);
}

#[tokio::test]
async fn test_poller_failure_keeps_last_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(2, 1)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = AdminSession::new(admin_api(&server.uri(), Some("tok")));
    let _poller = session.mount(Duration::from_millis(20)).await;

    // Several failed ticks later the last good summary is still shown
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(server.received_requests().await.unwrap().len() >= 3);
    assert_eq!(session.unread_message_count(), 2);
    assert_eq!(session.unread_notif_count(), 1);
}

#[tokio::test]
async fn test_dropping_poller_stops_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(0, 0)))
        .mount(&server)
        .await;

    let session = AdminSession::new(admin_api(&server.uri(), Some("tok")));
    let poller = session.mount(Duration::from_millis(20)).await;
    drop(poller);
    tokio::time::sleep(Duration::from_millis(30)).await;

    let settled = server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), settled);
}

#[tokio::test]
async fn test_admin_area_from_client_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "a-1",
                "username": "owner",
                "name": "Site Owner",
                "profileImage": "",
                "role": "owner",
                "createdAt": "2026-01-01T00:00:00Z"
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(1, 2)))
        .mount(&server)
        .await;

    let config: folio::FolioConfig = toml::from_str(&format!(
        "[client]\nbase_url = \"{}\"\npoll_interval_ms = 50\ntimeout_secs = 2\n",
        server.uri()
    ))
    .unwrap();

    let tokens = TokenStore::default();
    tokens.set("tok");
    let api = AdminApi::new(ApiClient::from_config(&config.client, tokens).unwrap());

    let area = enter_admin_area(&api, "/admin/dashboard", config.client.poll_interval())
        .await
        .unwrap_or_else(|_| panic!("authenticated entry should be allowed"));

    assert!(area.poller.is_running());
    assert_eq!(area.session.unread_notif_count(), 2);
    assert_eq!(
        area.session.admin_profile().map(|a| a.name),
        Some("Site Owner".to_string())
    );
}

// ============= Managers =============

#[tokio::test]
async fn test_deleting_message_refreshes_summary_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": "42",
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hello there",
                "read": false,
                "createdAt": "2026-01-01T00:00:00Z"
            }],
            "total": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/messages/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Message deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(0, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let session = AdminSession::new(admin_api(&server.uri(), Some("tok")));
    let ctx = ManagerContext::new(session).with_notifier(notifier.clone());

    let inbox = MessagesManager::mount(ctx).await;
    assert_eq!(inbox.messages().len(), 1);
    assert_eq!(inbox.unread_count(), 1);

    assert_eq!(inbox.delete("42").await, Ok(true));

    assert!(inbox.messages().is_empty());
    assert_eq!(
        notifier.last(),
        Some(Toast::Success("Message deleted successfully".into()))
    );
    server.verify().await;
}

#[tokio::test]
async fn test_save_button_persists_latest_edits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/footer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "tagline": "Old" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/footer"))
        .and(body_json(json!({ "tagline": "Newest" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Footer updated successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(0, 0)))
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let session = AdminSession::new(admin_api(&server.uri(), Some("tok")));
    let ctx = ManagerContext::new(Arc::clone(&session)).with_notifier(notifier.clone());

    let footer = DocumentManager::<Footer>::mount(ctx).await;
    assert_eq!(footer.state(), ManagerState::Ready);
    assert!(session.is_save_visible());

    footer.edit(|f| f.set("tagline", "Newer"));
    footer.edit(|f| f.set("tagline", "Newest"));

    assert_eq!(session.on_save().await, Ok(SaveOutcome::Saved));
    assert!(!session.is_saving());
    assert_eq!(
        notifier.last(),
        Some(Toast::Success("Footer updated successfully".into()))
    );
    server.verify().await;

    drop(footer);
    assert!(!session.is_save_visible());
}

#[tokio::test]
async fn test_failed_save_surfaces_server_detail_and_keeps_edits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/footer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "tagline": "Old" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/footer"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "detail": "Database is locked"
        })))
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let session = AdminSession::new(admin_api(&server.uri(), Some("tok")));
    let ctx = ManagerContext::new(Arc::clone(&session)).with_notifier(notifier.clone());

    let footer = DocumentManager::<Footer>::mount(ctx).await;
    footer.edit(|f| f.set("tagline", "Unsaved"));

    let result = session.on_save().await;

    assert!(matches!(result, Err(ClientError::Server { status: 500, .. })));
    assert!(!session.is_saving());
    assert_eq!(footer.state(), ManagerState::Ready);
    assert_eq!(
        footer.data().unwrap().get("tagline"),
        Some(&json!("Unsaved"))
    );
    assert_eq!(
        notifier.last(),
        Some(Toast::Error("Database is locked".into()))
    );
}

fn project_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "status": "coming-soon",
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_refetch_failure_after_create_keeps_saved_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "total": 0
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "detail": "Database is locked"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": project_json("p-1", "Folio"),
            "message": "Project created successfully",
            "id": "p-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(0, 0)))
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let session = AdminSession::new(admin_api(&server.uri(), Some("tok")));
    let ctx = ManagerContext::new(session).with_notifier(notifier.clone());

    let projects = ProjectsManager::mount(ctx).await;
    assert_eq!(projects.state(), ManagerState::Ready);

    let row = projects.add_draft().unwrap();
    projects.edit_item(row, |draft| draft.title = "Folio".into());
    projects.save_item(row).await.expect("create should succeed");

    assert_eq!(projects.state(), ManagerState::Ready);
    let entries = projects.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id.as_deref(), Some("p-1"));
    assert!(!entries[0].dirty);
    assert_eq!(
        notifier.last(),
        Some(Toast::Success("Saved project".into()))
    );
    server.verify().await;
}

#[tokio::test]
async fn test_saving_all_skill_categories_toasts_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/skills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "cloud": [{ "name": "AWS", "proficiency": 40 }],
                "tools": [{ "name": "Git", "proficiency": 70 }]
            }
        })))
        .mount(&server)
        .await;
    for category in ["cloud", "tools"] {
        Mock::given(method("PUT"))
            .and(path(format!("/api/admin/skills/{}", category)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": format!("Skills for '{}' updated successfully", category)
            })))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard-summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(0, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let session = AdminSession::new(admin_api(&server.uri(), Some("tok")));
    let ctx = ManagerContext::new(Arc::clone(&session)).with_notifier(notifier.clone());

    let skills = SkillsManager::mount(ctx).await;
    assert_eq!(skills.categories().len(), 2);

    assert_eq!(session.on_save().await, Ok(SaveOutcome::Saved));

    assert_eq!(
        notifier.toasts(),
        vec![Toast::Success("Saved 2 skill categories".into())]
    );
    server.verify().await;
}

// ============= Against the real server =============

#[tokio::test]
async fn test_skill_proficiency_round_trip() {
    let app = common::create_test_app(true).await;
    let origin = common::spawn_app(&app).await;

    let api = admin_api(&origin, None);
    api.login(common::OWNER, common::OWNER_PASSWORD)
        .await
        .expect("owner should log in");

    let session = AdminSession::new(api);
    let ctx = ManagerContext::new(Arc::clone(&session))
        .with_notifier(Arc::new(RecordingNotifier::default()));
    let skills = SkillsManager::mount(ctx).await;

    let before = skills.skills("programming").expect("seeded category");
    assert_eq!(before[0].proficiency, 50);

    assert!(skills.edit_skill("programming", 0, |s| s.proficiency = 80));
    skills
        .save_category("programming")
        .await
        .expect("save should succeed");

    let public = PublicApi::new(ApiClient::new(&origin, TokenStore::default()).unwrap());
    let after = public.skills().await.expect("public skills");
    assert_eq!(after["programming"][0].name, before[0].name);
    assert_eq!(after["programming"][0].proficiency, 80);
}

#[tokio::test]
async fn test_new_project_row_gets_server_id() {
    let app = common::create_test_app(false).await;
    let origin = common::spawn_app(&app).await;

    let api = admin_api(&origin, None);
    api.login(common::OWNER, common::OWNER_PASSWORD).await.unwrap();

    let session = AdminSession::new(api);
    let ctx = ManagerContext::new(Arc::clone(&session))
        .with_notifier(Arc::new(RecordingNotifier::default()));
    let projects = ProjectsManager::mount(ctx).await;
    assert!(projects.is_empty());

    let row = projects.add_draft().unwrap();
    projects.edit_item(row, |draft| {
        draft.title = "Folio".into();
        draft.description = "Portfolio CMS".into();
    });
    projects.save_item(row).await.expect("create should succeed");

    let entries = projects.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].id.is_some());
    assert!(!entries[0].dirty);
    assert_eq!(entries[0].draft.title, "Folio");

    projects.edit_item(0, |draft| draft.status = "completed".into());
    assert_eq!(session.on_save().await, Ok(SaveOutcome::Saved));

    let stored = app.state.store.list_projects().await.unwrap();
    assert_eq!(stored[0].status, "completed");
}

#[tokio::test]
async fn test_retry_after_partial_save_creates_each_row_once() {
    let app = common::create_test_app(false).await;
    let origin = common::spawn_app(&app).await;

    let api = admin_api(&origin, None);
    api.login(common::OWNER, common::OWNER_PASSWORD).await.unwrap();

    let session = AdminSession::new(api);
    let ctx = ManagerContext::new(Arc::clone(&session))
        .with_notifier(Arc::new(RecordingNotifier::default()));
    let projects = ProjectsManager::mount(ctx).await;

    let first = projects.add_draft().unwrap();
    projects.edit_item(first, |draft| draft.title = "Alpha".into());
    let second = projects.add_draft().unwrap();
    projects.edit_item(second, |draft| draft.title = "".into());

    let result = projects.save_all().await;
    assert!(matches!(result, Err(ClientError::Validation { ref field, .. }) if field == "title"));

    let entries = projects.entries();
    assert!(entries[first].id.is_some());
    assert!(!entries[first].dirty);
    assert!(entries[second].id.is_none());
    assert!(entries[second].dirty);

    projects.edit_item(second, |draft| draft.title = "Beta".into());
    projects.save_all().await.expect("retry should succeed");

    let mut titles: Vec<_> = app
        .state
        .store
        .list_projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Alpha", "Beta"]);
    assert!(projects.entries().iter().all(|entry| !entry.dirty));
}
