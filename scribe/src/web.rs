use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::{delete, get, post},
};
use narrative::{DocumentType, Pipeline, Session, SynthesisParameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::sessions::SessionRegistry;

/// State shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    async fn session(&self, id: Uuid) -> Result<Arc<Session>, ApiError> {
        self.sessions.get(id).await.ok_or(ApiError::UnknownSession(id))
    }
}

#[derive(Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct SynthesisResponse {
    pub model: String,
    pub text: String,
    pub attempts: usize,
}

#[derive(Serialize, Deserialize)]
pub struct DraftBody {
    pub text: String,
}

#[derive(Deserialize)]
pub struct DownloadQuery {
    pub document_type: Option<DocumentType>,
}

pub async fn index() -> Html<&'static str> {
    Html("Clinical narrative service is running. POST /sessions to begin.")
}

pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let (id, _) = state.sessions.create().await;
    let open = state.sessions.len().await;
    info!(%id, open, "session created");
    (StatusCode::CREATED, Json(SessionCreated { id }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or(ApiError::UnknownSession(id))?;
    let open = state.sessions.len().await;
    info!(%id, open, "session closed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn synthesize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(params): Json<SynthesisParameters>,
) -> Result<Json<SynthesisResponse>, ApiError> {
    let session = state.session(id).await?;
    debug!(%id, document = %params.document_type, detail = %params.detail_level, "synthesize requested");
    let synthesis = session.synthesize(&state.pipeline, &params).await?;
    Ok(Json(SynthesisResponse {
        model: synthesis.model,
        text: synthesis.text,
        attempts: synthesis.attempts,
    }))
}

pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftBody>, ApiError> {
    let session = state.session(id).await?;
    Ok(Json(DraftBody {
        text: session.draft().await,
    }))
}

pub async fn edit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DraftBody>,
) -> Result<Json<DraftBody>, ApiError> {
    let session = state.session(id).await?;
    session.edit(body.text.clone()).await;
    Ok(Json(body))
}

pub async fn clear_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let session = state.session(id).await?;
    session.clear().await;
    debug!(%id, "draft cleared");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session(id).await?;
    let export = session.export(query.document_type).await;
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name),
        ),
    ];
    Ok((headers, export.contents))
}

/// Build the application router with the provided state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", delete(delete_session))
        .route("/sessions/{id}/synthesize", post(synthesize))
        .route(
            "/sessions/{id}/draft",
            get(get_draft).put(edit_draft).delete(clear_draft),
        )
        .route("/sessions/{id}/draft/download", get(download_draft))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, pipeline: Pipeline) -> anyhow::Result<()> {
    let addr: std::net::SocketAddr = addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app(AppState::new(pipeline))).await?;
    Ok(())
}
