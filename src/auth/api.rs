//! Authentication API Endpoints
//! Mission: Provide sign-in and sign-out endpoints

use crate::auth::{
    jwt::JwtHandler,
    middleware::TOKEN_COOKIE,
    models::{SessionUser, SignInRequest, SignInResponse},
    user_store::UserStore,
};
use crate::error::ApiError;
use axum::{extract::State, Json};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar},
    WithRejection,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(user_store: Arc<UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
        }
    }
}

/// Sign-in endpoint - POST /api/auth/signin
pub async fn signin(
    State(state): State<AuthState>,
    WithRejection(Json(payload), _): WithRejection<Json<SignInRequest>, ApiError>,
) -> Result<Json<SignInResponse>, ApiError> {
    let user = state
        .user_store
        .authenticate(&payload.email, &payload.password)?;

    let token = state.jwt_handler.issue(user.id).map_err(|err| {
        error!("Token signing failed: {}", err);
        ApiError::Internal
    })?;

    info!(user_id = %user.id, role = user.role.as_str(), "✅ Sign-in successful");

    Ok(Json(SignInResponse {
        token,
        user: SessionUser::from_user(&user),
    }))
}

/// Sign-out endpoint - GET|POST /api/auth/signout
/// Tokens are stateless; the client discards its copy and the cookie is cleared.
pub async fn signout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, Json(json!({ "message": "Signed out" })))
}
