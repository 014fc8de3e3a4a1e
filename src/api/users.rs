//! `/api/users` - sign-up, account management

use crate::auth::{
    middleware::AuthError,
    models::{AuthContext, NewUser, SignUpResponse, UserResponse, UserUpdate},
    require_self_or_admin, AuthState,
};
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

pub fn router(auth: AuthState) -> Router {
    let public = Router::new().route("/", post(signup));

    let owner = Router::new()
        .route("/:id", get(read).put(update).delete(remove))
        .route_layer(from_fn_with_state(
            auth.clone(),
            crate::auth::auth_middleware,
        ));

    let admin = Router::new()
        .route("/", get(list).delete(remove_all))
        .route_layer(from_fn(crate::auth::require_admin))
        .route_layer(from_fn_with_state(
            auth.clone(),
            crate::auth::auth_middleware,
        ));

    public.merge(owner).merge(admin).with_state(auth)
}

/// POST /api/users
async fn signup(
    State(state): State<AuthState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewUser>, ApiError>,
) -> Result<(StatusCode, Json<SignUpResponse>), ApiError> {
    let user = state.user_store.create(&payload)?;
    info!(user_id = %user.id, "👤 New account signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "Successfully signed up!".to_string(),
            user: UserResponse::from_user(&user),
        }),
    ))
}

/// GET /api/users (admin)
async fn list(State(state): State<AuthState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.user_store.list()?;
    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}

/// DELETE /api/users (admin)
async fn remove_all(State(state): State<AuthState>) -> Result<Json<Value>, ApiError> {
    state.user_store.delete_all()?;
    Ok(Json(json!({ "message": "All users deleted" })))
}

/// GET /api/users/:id (self or admin)
async fn read(
    State(state): State<AuthState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = authorize_target(&ctx, &id)?;
    let user = state
        .user_store
        .find_by_id(id)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from_user(&user)))
}

/// PUT /api/users/:id (self or admin; only admins may change roles)
async fn update(
    State(state): State<AuthState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    WithRejection(Json(changes), _): WithRejection<Json<UserUpdate>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = authorize_target(&ctx, &id)?;

    if let Some(role) = changes.role {
        if !ctx.is_admin() && role != ctx.role {
            warn!(user_id = %ctx.id, "Non-admin attempted a role change");
            return Err(AuthError::AdminRequired.into());
        }
    }

    let user = state.user_store.update(id, &changes)?;
    Ok(Json(UserResponse::from_user(&user)))
}

/// DELETE /api/users/:id (self or admin)
async fn remove(
    State(state): State<AuthState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = authorize_target(&ctx, &id)?;
    state.user_store.delete(id)?;
    Ok(Json(json!({ "message": "User deleted" })))
}

/// Ownership is checked before the id is resolved. A malformed id can only
/// belong to nobody: admins get 404, everyone else 403.
fn authorize_target(ctx: &AuthContext, raw: &str) -> Result<Uuid, ApiError> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) => {
            require_self_or_admin(ctx, id)?;
            Ok(id)
        }
        Err(_) if ctx.is_admin() => Err(ApiError::NotFound("User not found".to_string())),
        Err(_) => Err(AuthError::Forbidden.into()),
    }
}
