use super::error::ApiResult;
use super::AppState;
use crate::core::{
    CoreError, DirectoryScanner, FileHandler, SearchEngine, SearchMatch, SearchQuery,
};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub path: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFileRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub old_path: String,
    pub new_path: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub src_path: String,
    pub dest_path: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PathMessage {
    pub message: &'static str,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct RenameMessage {
    pub message: &'static str,
    pub old_path: String,
    pub new_path: String,
}

#[derive(Debug, Serialize)]
pub struct MoveMessage {
    pub message: &'static str,
    pub src_path: String,
    pub dest_path: String,
}

#[derive(Debug, Serialize)]
pub struct CommitMessage {
    pub message: &'static str,
    pub commit_message: String,
}

/// Runs a synchronous core operation on the blocking pool.
async fn blocking<T, F>(state: &Arc<AppState>, op: F) -> ApiResult<T>
where
    F: FnOnce(&AppState) -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    Ok(tokio::task::spawn_blocking(move || op(state.as_ref())).await??)
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /files`
pub async fn list_files(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    let files = blocking(&state, |s| DirectoryScanner::new(&s.resolver).list_files()).await?;
    Ok(Json(files))
}

/// `POST /files/search`
pub async fn search_files(
    State(state): State<Arc<AppState>>,
    Json(query): Json<SearchQuery>,
) -> ApiResult<Json<Vec<SearchMatch>>> {
    let matches = blocking(&state, move |s| SearchEngine::new(&s.resolver).search(&query)).await?;
    Ok(Json(matches))
}

/// `GET /files/{path}`
pub async fn read_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> ApiResult<Json<FileContent>> {
    let relative = path.clone();
    let content = blocking(&state, move |s| {
        FileHandler::new(&s.resolver).read_file(&relative)
    })
    .await?;
    Ok(Json(FileContent { path, content }))
}

/// `POST /files`
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateFileRequest>,
) -> ApiResult<Json<PathMessage>> {
    let path = request.path.clone();
    blocking(&state, move |s| {
        FileHandler::new(&s.resolver).create_file(&request.path, &request.content)
    })
    .await?;
    Ok(Json(PathMessage {
        message: "File created.",
        path,
    }))
}

/// `PUT /files/{path}`
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Json(request): Json<UpdateFileRequest>,
) -> ApiResult<Json<PathMessage>> {
    let relative = path.clone();
    blocking(&state, move |s| {
        FileHandler::new(&s.resolver).update_file(&relative, &request.content)
    })
    .await?;
    Ok(Json(PathMessage {
        message: "File updated.",
        path,
    }))
}

/// `POST /files/rename`
pub async fn rename_file(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenameRequest>,
) -> ApiResult<Json<RenameMessage>> {
    let RenameRequest { old_path, new_path } = request;
    let (from, to) = (old_path.clone(), new_path.clone());
    blocking(&state, move |s| FileHandler::new(&s.resolver).rename(&from, &to)).await?;
    Ok(Json(RenameMessage {
        message: "File renamed.",
        old_path,
        new_path,
    }))
}

/// `POST /files/move`
pub async fn move_file(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<Json<MoveMessage>> {
    let MoveRequest {
        src_path,
        dest_path,
    } = request;
    let (from, to) = (src_path.clone(), dest_path.clone());
    blocking(&state, move |s| FileHandler::new(&s.resolver).move_path(&from, &to)).await?;
    Ok(Json(MoveMessage {
        message: "File moved.",
        src_path,
        dest_path,
    }))
}

/// `DELETE /files`
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteRequest>,
) -> ApiResult<Json<PathMessage>> {
    let path = request.path.clone();
    blocking(&state, move |s| {
        FileHandler::new(&s.resolver).delete_file(&request.path)
    })
    .await?;
    Ok(Json(PathMessage {
        message: "File deleted.",
        path,
    }))
}

/// `POST /commit`
pub async fn commit(
    State(state): State<Arc<AppState>>,
    request: Option<Json<CommitRequest>>,
) -> ApiResult<Json<CommitMessage>> {
    let message = request
        .and_then(|Json(body)| body.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "Workspace update {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            )
        });

    let commit_message = message.clone();
    blocking(&state, move |s| s.vcs.commit(&message))
        .await
        .map_err(|e| {
            tracing::error!("Commit failed: {}", e);
            e
        })?;
    Ok(Json(CommitMessage {
        message: "Changes committed.",
        commit_message,
    }))
}
