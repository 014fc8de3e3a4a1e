//! `/api/auth` routes

use crate::auth::{api as auth_api, AuthState};
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(auth: AuthState) -> Router {
    Router::new()
        .route("/signin", post(auth_api::signin))
        .route("/signout", get(auth_api::signout).post(auth_api::signout))
        .with_state(auth)
}
