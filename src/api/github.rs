//! `/api/github` - admin-only repository lookup for the project editor

use crate::auth::{auth_middleware, require_admin, AuthState};
use crate::error::ApiError;
use crate::github::{GithubClient, RepoSummary};
use axum::{
    extract::{Query, State},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RepoQuery {
    pub username: Option<String>,
}

pub fn router(client: Arc<GithubClient>, auth: AuthState) -> Router {
    Router::new()
        .route("/repos", get(list_repos))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(auth, auth_middleware))
        .with_state(client)
}

async fn list_repos(
    State(client): State<Arc<GithubClient>>,
    Query(query): Query<RepoQuery>,
) -> Result<Json<Vec<RepoSummary>>, ApiError> {
    let repos = client.list_repos(query.username.as_deref()).await?;
    Ok(Json(repos))
}
