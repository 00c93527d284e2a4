use std::{collections::HashMap, io::Write};

use axum::{
    Form, Json, Router,
    extract::{Multipart, Path},
    http::StatusCode,
    routing::{get, post},
};
use pottery_client::{ClientConfig, ClientError, Session};
use pottery_model::{Field, OperationId};
use serde_json::{Value, json};

async fn create_task() -> Json<Value> {
    Json(json!(["abc123"]))
}

async fn start_repo(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "repoId": "r42",
        "taskId": form.get("taskId"),
        "variant": form.get("variant"),
        "usingTestingVersion": false,
    }))
}

async fn tag_repo(Path(repo): Path<String>) -> Json<Value> {
    assert_eq!(repo, "r42");
    Json(json!({"tag": "v1"}))
}

async fn request_test(Path((repo, tag)): Path<(String, String)>) -> Json<Value> {
    Json(json!({"repoId": repo, "tag": tag, "status": "PENDING", "needsRetry": false}))
}

async fn read_file(Path((_, _, path)): Path<(String, String, String)>) -> String {
    format!("contents of {path}")
}

async fn upload(
    Path((_, _, path)): Path<(String, String, String)>,
    mut multipart: Multipart,
) -> Json<Value> {
    let mut out = json!({ "path": path });
    while let Some(part) = multipart.next_field().await.unwrap() {
        let name = part.name().unwrap_or_default().to_string();
        let file_name = part.file_name().map(str::to_string);
        let content_type = part.content_type().map(str::to_string);
        let bytes = part.bytes().await.unwrap();
        out[name.as_str()] = json!({
            "fileName": file_name,
            "contentType": content_type,
            "content": String::from_utf8_lossy(&bytes),
        });
    }
    Json(out)
}

async fn broken_status() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "plain text error")
}

async fn missing_task() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Task not found"})),
    )
}

fn api() -> Router {
    Router::new()
        .route("/tasks/create", post(create_task))
        .route("/tasks/{task_id}", get(missing_task))
        .route("/repo", post(start_repo))
        .route("/repo/{repo_id}", post(tag_repo))
        .route("/repo/{repo_id}/{tag}/{*path}", get(read_file).post(upload))
        .route("/submissions/{repo_id}/{tag}", post(request_test))
        .route("/status", get(broken_status))
}

async fn serve() -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().nest("/api", api()))
            .await
            .unwrap();
    });
    ClientConfig::new(format!("http://{addr}/api"))
}

#[tokio::test]
async fn chain_over_http() {
    let session = Session::connect(serve().await).unwrap();

    session.run(OperationId::CreateTask).await.unwrap();
    assert_eq!(session.fields().get(Field::TaskId).as_deref(), Some("abc123"));

    session.set(Field::ValidityMinutes, "60");
    session.set(Field::Variant, "java");
    let report = session.run(OperationId::StartRepo).await.unwrap();
    assert!(report.schema.is_none());
    assert_eq!(session.fields().get(Field::RepoId).as_deref(), Some("r42"));
    assert!(session.view().result.contains("\"taskId\": \"abc123\""));

    session.run(OperationId::TagRepo).await.unwrap();
    assert_eq!(session.fields().get(Field::SubmissionTag).as_deref(), Some("v1"));

    let report = session.run(OperationId::RequestTest).await.unwrap();
    assert!(report.success);
    assert!(report.schema.is_none());
    assert_eq!(session.view().error, "");
}

#[tokio::test]
async fn multipart_upload() {
    let session = Session::connect(serve().await).unwrap();

    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "hello pottery").unwrap();

    session.set(Field::RepoId, "r42");
    session.set(Field::RepoTag, "HEAD");
    session.set(Field::FileName, "docs/notes.txt");
    session.set(Field::UploadFile, file.path().to_string_lossy());

    let report = session.run(OperationId::UpdateFile).await.unwrap();
    assert!(report.success);

    let echoed: Value = serde_json::from_str(&session.view().result).unwrap();
    assert!(echoed["path"].as_str().unwrap().ends_with("notes.txt"));
    assert_eq!(echoed["data"]["content"], "hello pottery");
    assert_eq!(echoed["data"]["contentType"], "text/plain");
    assert!(echoed.get("mimeType").is_none());
}

#[tokio::test]
async fn unreadable_upload_is_local_error() {
    let session = Session::connect(serve().await).unwrap();
    let dir = tempfile::tempdir().unwrap();

    session.set(Field::RepoId, "r42");
    session.set(Field::RepoTag, "HEAD");
    session.set(Field::FileName, "a.txt");
    session.set(Field::UploadFile, dir.path().join("gone.txt").to_string_lossy());

    let err = session.run(OperationId::UpdateFile).await.unwrap_err();
    assert!(matches!(err, ClientError::Io { .. }));
    assert_eq!(session.view().result, "");
}

#[tokio::test]
async fn plain_text_success_is_verbatim() {
    let session = Session::connect(serve().await).unwrap();
    session.set(Field::RepoId, "r42");
    session.set(Field::RepoTag, "HEAD");
    session.set(Field::ReadFile, "src/Hello.java");

    session.run(OperationId::ReadFile).await.unwrap();
    assert_eq!(session.view().result, "contents of src/Hello.java");
}

#[tokio::test]
async fn plain_text_500() {
    let session = Session::connect(serve().await).unwrap();
    session.set(Field::TaskId, "T1");
    let before = session.fields().snapshot();

    let report = session.run(OperationId::ServerStatus).await.unwrap();
    assert!(!report.success);
    assert_eq!(report.status, Some(500));

    let view = session.view();
    assert_eq!(view.result, "Error");
    assert!(view.error.contains("plain text error"));
    assert_eq!(session.fields().snapshot(), before);
}

#[tokio::test]
async fn json_error_body() {
    let session = Session::connect(serve().await).unwrap();
    session.set(Field::TaskId, "missing");

    let report = session.run(OperationId::GetTask).await.unwrap();
    assert_eq!(report.status, Some(404));
    assert!(session.view().error.contains("\"message\": \"Task not found\""));
}

#[tokio::test]
async fn connection_refused_is_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = Session::connect(ClientConfig::new(format!("http://{addr}/api"))).unwrap();
    let report = session.run(OperationId::ServerStatus).await.unwrap();

    assert!(!report.success);
    assert_eq!(report.status, None);
    let view = session.view();
    assert_eq!(view.result, "Error");
    assert!(view.error.contains("\"transport\""));
}
