//! Authentication Middleware
//! Mission: Resolve the caller from a bearer token and guard mutating endpoints

use crate::auth::{
    api::AuthState,
    jwt::TokenError,
    models::AuthContext,
};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization, HeaderMapExt},
};
use tracing::{debug, warn};
use uuid::Uuid;

/// Cookie consulted when no `Authorization` header is present
pub const TOKEN_COOKIE: &str = "token";

/// Auth gateway: verifies the token, loads the user and attaches an [`AuthContext`]
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(req.headers()).ok_or(AuthError::MissingToken)?;

    let user_id = state.jwt_handler.verify(&token).map_err(|err| {
        match err {
            TokenError::Expired => debug!("Rejected expired token"),
            _ => warn!("Rejected invalid token"),
        }
        AuthError::InvalidToken
    })?;

    let user = state
        .user_store
        .find_by_id(user_id)
        .map_err(|err| AuthError::Store(err.into()))?
        .ok_or_else(|| {
            warn!(%user_id, "Token for deleted user");
            AuthError::UserGone
        })?;

    req.extensions_mut().insert(AuthContext::from_user(&user));

    Ok(next.run(req).await)
}

/// Access policy: admin only. Must run after [`auth_middleware`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    let ctx = extract_context(&req).ok_or(AuthError::MissingToken)?;

    if !ctx.is_admin() {
        warn!(user_id = %ctx.id, path = %req.uri().path(), "Admin check failed");
        return Err(AuthError::AdminRequired);
    }

    Ok(next.run(req).await)
}

/// Access policy: the caller owns `owner_id`, or is an admin
pub fn require_self_or_admin(ctx: &AuthContext, owner_id: Uuid) -> Result<(), AuthError> {
    if ctx.is_admin() || ctx.id == owner_id {
        return Ok(());
    }
    warn!(user_id = %ctx.id, %owner_id, "Ownership check failed");
    Err(AuthError::Forbidden)
}

/// Bearer header first, then the `token` cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Extract the authenticated identity (use after auth middleware)
pub fn extract_context(req: &Request) -> Option<&AuthContext> {
    req.extensions().get::<AuthContext>()
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    UserGone,
    AdminRequired,
    Forbidden,
    Store(ApiError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized("Authorization token missing"),
            AuthError::InvalidToken => ApiError::Unauthorized("Invalid or expired token"),
            AuthError::UserGone => ApiError::Unauthorized("User no longer exists"),
            AuthError::AdminRequired => ApiError::Forbidden("Admin privileges required"),
            AuthError::Forbidden => ApiError::Forbidden("Not authorized to access this resource"),
            AuthError::Store(api_err) => api_err,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
