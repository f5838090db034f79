//! HTTP surface over the core engine.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod openapi;

use crate::config::WorkspaceConfig;
use crate::core::{CoreError, GitCommitter, PathResolver, VersionControl};
use auth::{require_secret, AuthManager};
use axum::extract::{Path, State};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Service-wide state, immutable after startup.
pub struct AppState {
    pub resolver: PathResolver,
    pub auth: AuthManager,
    pub vcs: Arc<dyn VersionControl>,
}

impl AppState {
    pub fn new(config: &WorkspaceConfig) -> Result<Self, CoreError> {
        let resolver = PathResolver::new(&config.base_path)?;
        let vcs = Arc::new(GitCommitter::new(&config.git_binary, resolver.root()));
        Ok(Self {
            resolver,
            auth: AuthManager::new(&config.shared_secret),
            vcs,
        })
    }

    /// Replaces the version-control collaborator.
    pub fn with_version_control(mut self, vcs: Arc<dyn VersionControl>) -> Self {
        self.vcs = vcs;
        self
    }
}

/// Read/update for a root-level file whose name collides with a static
/// `/files/<name>` route; those routes would otherwise shadow `/files/*path`.
fn root_file(name: &'static str) -> MethodRouter<Arc<AppState>> {
    get(move |state: State<Arc<AppState>>| {
        handlers::read_file(state, Path(name.to_string()))
    })
    .put(
        move |state: State<Arc<AppState>>, body: Json<handlers::UpdateFileRequest>| {
            handlers::update_file(state, Path(name.to_string()), body)
        },
    )
}

/// Builds the application router. Everything except `/health` and
/// `/openapi.json` sits behind the shared-secret check.
pub fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route(
            "/files",
            get(handlers::list_files)
                .post(handlers::create_file)
                .delete(handlers::delete_file),
        )
        .route("/files/search", root_file("search").post(handlers::search_files))
        .route("/files/rename", root_file("rename").post(handlers::rename_file))
        .route("/files/move", root_file("move").post(handlers::move_file))
        .route(
            "/files/*path",
            get(handlers::read_file).put(handlers::update_file),
        )
        .route("/commit", post(handlers::commit))
        .route_layer(from_fn_with_state(state.clone(), require_secret));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(openapi::openapi_schema))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
