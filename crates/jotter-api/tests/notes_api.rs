use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jotter_api::{app_router, AppConfig, AppState};
use jotter_core::config::ClientConfig;
use jotter_core::models::DeleteNoteRequest;
use jotter_core::{
    CardView, EditorContext, EditorMode, Error, FailureNotifier, HttpNoteStorage, Note, NoteCard,
    NoteStorage, Outcome, ViewRefresh,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

struct TestApp {
    api_url: String,
    base_url: String,
}

async fn spawn_app(pairs: &[(&str, &str)]) -> TestApp {
    let map: HashMap<&str, &str> = pairs.iter().copied().collect();
    let config = AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
        .expect("valid config");
    let state = AppState::from_config(Arc::new(config))
        .await
        .expect("state builds");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move { axum::serve(listener, app_router(state)).await });

    let base_url = format!("http://127.0.0.1:{port}");
    TestApp {
        api_url: format!("{base_url}/api"),
        base_url,
    }
}

fn storage(app: &TestApp, token: Option<&str>) -> HttpNoteStorage {
    let config = ClientConfig::new(&app.api_url, token.map(str::to_string)).unwrap();
    HttpNoteStorage::new(&config).unwrap()
}

#[derive(Default)]
struct Hooks {
    refreshes: AtomicUsize,
    failures: Mutex<Vec<String>>,
}

impl ViewRefresh for Hooks {
    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

impl FailureNotifier for Hooks {
    fn notify_failure(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}

fn context(storage: HttpNoteStorage, hooks: &Arc<Hooks>) -> EditorContext<HttpNoteStorage> {
    EditorContext::new(
        Arc::new(storage),
        Arc::clone(hooks) as Arc<dyn ViewRefresh>,
        Arc::clone(hooks) as Arc<dyn FailureNotifier>,
    )
}

#[tokio::test]
async fn healthz_reports_note_count() {
    let app = spawn_app(&[]).await;
    let body: Value = reqwest::get(format!("{}/healthz", app.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["notes"], 0);
}

#[tokio::test]
async fn dialog_creates_edits_and_deletes_through_service() {
    let app = spawn_app(&[]).await;
    let hooks = Arc::new(Hooks::default());
    let context = context(storage(&app, None), &hooks);

    let dialog = context.dialog();
    dialog.open(EditorMode::Create).await;
    dialog.set_title("Groceries").await;
    dialog.set_content("milk, eggs").await;
    let Outcome::Saved(created) = dialog.submit().await else {
        panic!("create should succeed");
    };
    assert!(!dialog.is_open().await);
    assert_eq!(hooks.refreshes.load(Ordering::SeqCst), 1);

    let listed = context.storage().list().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);
    assert!(!CardView::render(&created).is_edited);

    let card = NoteCard::new(created.clone(), &context);
    let editor = card.activate().await;
    editor.set_title("Groceries v2").await;
    let Outcome::Saved(updated) = editor.submit().await else {
        panic!("update should succeed");
    };
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Groceries v2");
    assert_eq!(updated.content, "milk, eggs");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= updated.created_at);

    let card = NoteCard::new(updated, &context);
    assert_eq!(card.activate().await.delete().await, Outcome::Deleted);
    assert!(context.storage().list().await.unwrap().is_empty());
    assert_eq!(hooks.refreshes.load(Ordering::SeqCst), 3);
    assert!(hooks.failures.lock().unwrap().is_empty());
}

#[tokio::test]
async fn editing_a_vanished_note_fails_generically() {
    let app = spawn_app(&[]).await;
    let hooks = Arc::new(Hooks::default());
    let context = context(storage(&app, None), &hooks);

    let ghost = Note::new("Gone", "already deleted");
    let card = NoteCard::new(ghost, &context);
    let outcome = card.activate().await.submit().await;

    let Outcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(failure.diagnostic_cause().contains("(404)"));
    assert!(card.is_dialog_open().await);
    assert_eq!(
        *hooks.failures.lock().unwrap(),
        vec!["Something went wrong. Please try again".to_string()]
    );
    assert_eq!(hooks.refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_service_fails_generically_and_keeps_the_form() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig::new(format!("http://127.0.0.1:{port}/api"), None)
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let hooks = Arc::new(Hooks::default());
    let context = context(HttpNoteStorage::new(&config).unwrap(), &hooks);

    let dialog = context.dialog();
    dialog.open(EditorMode::Create).await;
    dialog.set_title("A").await;
    dialog.set_content("B").await;
    let outcome = dialog.submit().await;

    let Outcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(failure.diagnostic_cause().contains("HTTP request failed"));
    assert_eq!(
        *hooks.failures.lock().unwrap(),
        vec!["Something went wrong. Please try again".to_string()]
    );
    assert_eq!(hooks.refreshes.load(Ordering::SeqCst), 0);

    let view = dialog.view().await;
    assert!(view.open);
    assert_eq!(view.title, "A");
    assert_eq!(view.content, "B");
    assert!(view.submit_enabled);
    assert!(!view.submit_loading);
}

#[tokio::test]
async fn delete_of_unknown_note_is_not_found() {
    let app = spawn_app(&[]).await;
    let err = storage(&app, None)
        .delete(DeleteNoteRequest {
            id: jotter_core::NoteId::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 404, .. }));
}

#[tokio::test]
async fn invalid_note_is_rejected_per_field() {
    let app = spawn_app(&[("JOTTER_MAX_TITLE_CHARS", "5")]).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/notes", app.api_url))
        .json(&json!({ "title": "", "content": "anything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fields"], json!({ "title": "Title is required" }));

    let response = client
        .post(format!("{}/notes", app.api_url))
        .json(&json!({ "title": "too long", "content": "x" }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["fields"]["title"],
        "Title must be at most 5 characters"
    );

    let response = client
        .put(format!("{}/notes", app.api_url))
        .json(&json!({ "title": "no id", "content": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn token_is_required_when_configured() {
    let app = spawn_app(&[("JOTTER_API_TOKEN", "letmein")]).await;

    let err = storage(&app, None).list().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 401, .. }));
    let err = storage(&app, Some("wrong")).list().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 401, .. }));

    assert!(storage(&app, Some("letmein")).list().await.unwrap().is_empty());

    let health = reqwest::get(format!("{}/healthz", app.base_url))
        .await
        .unwrap();
    assert_eq!(health.status(), 200);
}

#[tokio::test]
async fn created_note_uses_camel_case_wire_format() {
    let app = spawn_app(&[]).await;
    let response = reqwest::Client::new()
        .post(format!("{}/notes", app.api_url))
        .json(&json!({ "title": "A", "content": "B" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "A");
    assert_eq!(body["content"], "B");
    assert_eq!(body["createdAt"], body["updatedAt"]);
    assert!(body["id"].is_string());
}
