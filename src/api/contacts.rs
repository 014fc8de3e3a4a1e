//! `/api/contacts` - public contact form, admin inbox management

use crate::auth::{auth_middleware, require_admin, AuthState};
use crate::contacts::{ContactPayload, ContactRecord, ContactStore};
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

pub fn router(store: ContactStore, auth: AuthState) -> Router {
    let public = Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(read));

    let admin = Router::new()
        .route("/", delete(remove_all))
        .route("/:id", put(update).delete(remove))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(auth, auth_middleware));

    public.merge(admin).with_state(store)
}

async fn list(State(store): State<ContactStore>) -> Result<Json<Vec<ContactRecord>>, ApiError> {
    Ok(Json(store.list()?))
}

async fn create(
    State(store): State<ContactStore>,
    WithRejection(Json(payload), _): WithRejection<Json<ContactPayload>, ApiError>,
) -> Result<(StatusCode, Json<ContactRecord>), ApiError> {
    let record = store.create(&payload)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn read(
    State(store): State<ContactStore>,
    Path(id): Path<String>,
) -> Result<Json<ContactRecord>, ApiError> {
    Ok(Json(store.get(&id)?))
}

async fn update(
    State(store): State<ContactStore>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ContactPayload>, ApiError>,
) -> Result<Json<ContactRecord>, ApiError> {
    Ok(Json(store.update(&id, &payload)?))
}

async fn remove(
    State(store): State<ContactStore>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    store.delete(&id)?;
    Ok(Json(json!({ "message": "Contact deleted" })))
}

async fn remove_all(State(store): State<ContactStore>) -> Result<Json<Value>, ApiError> {
    store.delete_all()?;
    Ok(Json(json!({ "message": "All contacts deleted" })))
}
