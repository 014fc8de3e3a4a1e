//! REST API
//! Mission: Wire stores, guards and handlers into one `/api` router

pub mod auth;
pub mod contacts;
pub mod github;
pub mod resources;
pub mod users;

use crate::auth::{AuthState, JwtHandler, UserStore};
use crate::contacts::ContactStore;
use crate::db::Database;
use crate::github::GithubClient;
use crate::middleware::request_logging;
use crate::resources::{OrderedCollection, ProjectStore, QualificationStore};
use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Everything the handlers need, cloned cheaply into each sub-router
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub projects: ProjectStore,
    pub qualifications: QualificationStore,
    pub contacts: ContactStore,
    pub github: Arc<GithubClient>,
}

impl AppState {
    pub fn new(
        db: Database,
        user_store: UserStore,
        jwt_handler: JwtHandler,
        github: GithubClient,
    ) -> Self {
        Self {
            auth: AuthState::new(Arc::new(user_store), Arc::new(jwt_handler)),
            projects: OrderedCollection::new(db.clone()),
            qualifications: OrderedCollection::new(db.clone()),
            contacts: ContactStore::new(db),
            github: Arc::new(github),
        }
    }
}

/// Full application router: `/health` plus the `/api` surface
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth::router(state.auth.clone()))
        .nest("/users", users::router(state.auth.clone()))
        .nest(
            "/projects",
            resources::router(state.projects.clone(), state.auth.clone()),
        )
        .nest(
            "/qualifications",
            resources::router(state.qualifications.clone(), state.auth.clone()),
        )
        .nest(
            "/contacts",
            contacts::router(state.contacts.clone(), state.auth.clone()),
        )
        .nest("/github", github::router(state.github.clone(), state.auth));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
