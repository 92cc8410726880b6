use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use llm::{Outcome, ScriptedClient};
use narrative::{ModelResolver, Pipeline};
use scribe::{AppState, app};
use serde_json::{Value, json};
use tower::ServiceExt;

fn router(client: ScriptedClient) -> Router {
    let pipeline = Pipeline::new(
        Arc::new(client),
        ModelResolver::new(vec!["a".into(), "b".into()]),
    );
    app(AppState::new(pipeline))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    (status, bytes.to_vec())
}

async fn new_session(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let json: Value = serde_json::from_slice(&body).unwrap();
    json["id"].as_str().unwrap().to_string()
}

fn json_of(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn index_serves() {
    let app = router(ScriptedClient::new());
    let (status, _) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn synthesize_then_edit_then_download() {
    let app = router(
        ScriptedClient::new()
            .with_outcome("a", Outcome::NotFound)
            .with_text("b", "Patient treated for UTI..."),
    );
    let id = new_session(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/sessions/{id}/synthesize"),
        Some(json!({
            "document_type": "discharge-summary",
            "detail_level": "standard",
            "raw_notes": "01/02 admitted UTI. IV antibiotics. 05/02 discharged."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json = json_of(&body);
    assert_eq!(json["model"], "b");
    assert_eq!(json["attempts"], 2);
    assert_eq!(json["text"], "Patient treated for UTI...");

    let (_, body) = send(&app, "GET", &format!("/sessions/{id}/draft"), None).await;
    assert_eq!(json_of(&body)["text"], "Patient treated for UTI...");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/sessions/{id}/draft"),
        Some(json!({"text": "Reviewed and amended."})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/sessions/{id}/draft/download"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"discharge-summary.txt\""
    );
    let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    assert_eq!(&bytes[..], b"Reviewed and amended.");
}

#[tokio::test]
async fn empty_notes_warn_and_keep_draft() {
    let app = router(ScriptedClient::new().with_text("a", "unused"));
    let id = new_session(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/sessions/{id}/synthesize"),
        Some(json!({"document_type": "gp-letter", "detail_level": "concise", "raw_notes": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_of(&body)["error"]["code"], "INVALID_PARAMETERS");

    let (_, body) = send(&app, "GET", &format!("/sessions/{id}/draft"), None).await;
    assert_eq!(json_of(&body)["text"], "");
}

#[tokio::test]
async fn backend_failure_is_bad_gateway() {
    let app = router(ScriptedClient::new().with_outcome("a", Outcome::Backend("500: internal".into())));
    let id = new_session(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/sessions/{id}/synthesize"),
        Some(json!({"document_type": "referral", "raw_notes": "chest pain"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json_of(&body)["error"]["message"], "backend error: 500: internal");
}

#[tokio::test]
async fn clear_resets_draft() {
    let app = router(ScriptedClient::new());
    let id = new_session(&app).await;
    send(&app, "PUT", &format!("/sessions/{id}/draft"), Some(json!({"text": "old"}))).await;

    let (status, _) = send(&app, "DELETE", &format!("/sessions/{id}/draft"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &format!("/sessions/{id}/draft"), None).await;
    assert_eq!(json_of(&body)["text"], "");
}

#[tokio::test]
async fn unknown_session_is_404() {
    let app = router(ScriptedClient::new());
    let (status, body) = send(
        &app,
        "GET",
        "/sessions/00000000-0000-0000-0000-000000000000/draft",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_of(&body)["error"]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn download_honours_requested_document_type() {
    let app = router(ScriptedClient::new());
    let id = new_session(&app).await;
    send(&app, "PUT", &format!("/sessions/{id}/draft"), Some(json!({"text": "SBAR"}))).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/sessions/{id}/draft/download?document_type=handover"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"handover.txt\""
    );
}

#[tokio::test]
async fn closed_session_is_forgotten() {
    let app = router(ScriptedClient::new());
    let id = new_session(&app).await;
    send(&app, "PUT", &format!("/sessions/{id}/draft"), Some(json!({"text": "draft"}))).await;

    let (status, _) = send(&app, "DELETE", &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/sessions/{id}/draft"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_of(&body)["error"]["code"], "SESSION_NOT_FOUND");

    let (status, _) = send(&app, "DELETE", &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
