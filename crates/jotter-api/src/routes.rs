use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use jotter_core::models::{CreateNoteRequest, DeleteNoteRequest, UpdateNoteRequest};
use jotter_core::{Note, NoteDraft, NoteSchema};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::verify_bearer;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::store::NoteRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    notes: Arc<NoteRepository>,
    schema: NoteSchema,
}

impl AppState {
    /// Build state, loading the snapshot when one is configured.
    pub async fn from_config(config: Arc<AppConfig>) -> Result<Self, AppError> {
        let notes = match &config.data_file {
            Some(path) => NoteRepository::open(path).await?,
            None => NoteRepository::in_memory(),
        };
        Ok(Self {
            schema: NoteSchema::new().with_max_title_chars(config.max_title_chars),
            notes: Arc::new(notes),
            config,
        })
    }
}

pub fn app_router(state: AppState) -> Router {
    let note_routes = Router::new()
        .route(
            "/notes",
            get(list_notes)
                .post(create_note)
                .put(update_note)
                .delete(delete_note),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", note_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    notes: usize,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        notes: state.notes.count().await,
    })
}

async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.config.api_token.as_deref() {
        verify_bearer(request.headers(), expected)?;
    }
    Ok(next.run(request).await)
}

async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(state.notes.list().await?))
}

async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let Json(request) = body.map_err(reject_body)?;
    let draft = state
        .schema
        .validate(&NoteDraft::new(request.title, request.content))
        .map_err(AppError::Validation)?;

    let note = state.notes.create(draft.into()).await?;
    tracing::info!(endpoint = "create_note", note = %note.id, "Created note");
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<AppState>,
    body: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, AppError> {
    let Json(request) = body.map_err(reject_body)?;
    let draft = state
        .schema
        .validate(&request.draft())
        .map_err(AppError::Validation)?;

    let note = state
        .notes
        .update(UpdateNoteRequest::new(request.id, draft))
        .await?;
    tracing::info!(endpoint = "update_note", note = %note.id, "Updated note");
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<AppState>,
    body: Result<Json<DeleteNoteRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = body.map_err(reject_body)?;
    let id = request.id;
    state.notes.delete(request).await?;
    tracing::info!(endpoint = "delete_note", note = %id, "Deleted note");
    Ok(StatusCode::NO_CONTENT)
}

fn reject_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}
