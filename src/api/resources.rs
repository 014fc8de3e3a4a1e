//! Ordered resource routes, shared by `/api/projects` and `/api/qualifications`
//!
//! Reads are public. Every mutation runs behind the auth gateway and the
//! admin guard.

use crate::auth::{auth_middleware, require_admin, AuthState};
use crate::error::ApiError;
use crate::resources::{Entry, OrderedCollection, OrderedResource, ReorderEntry, ResourcePayload};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{json, Value};

const EMPTY_ORDER: &str = "Order payload must be a non-empty array";
const MALFORMED_ORDER_ENTRY: &str = "Each order entry needs an id and a numeric order";

pub fn router<T: OrderedResource>(store: OrderedCollection<T>, auth: AuthState) -> Router {
    let public = Router::new()
        .route("/", get(list::<T>))
        .route("/:id", get(read::<T>));

    let admin = Router::new()
        .route("/", post(create::<T>).delete(remove_all::<T>))
        .route("/reorder", patch(reorder::<T>))
        .route("/:id", put(update::<T>).delete(remove::<T>))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(auth, auth_middleware));

    public.merge(admin).with_state(store)
}

async fn list<T: OrderedResource>(
    State(store): State<OrderedCollection<T>>,
) -> Result<Json<Vec<Entry<T>>>, ApiError> {
    Ok(Json(store.list()?))
}

async fn read<T: OrderedResource>(
    State(store): State<OrderedCollection<T>>,
    Path(id): Path<String>,
) -> Result<Json<Entry<T>>, ApiError> {
    Ok(Json(store.get(&id)?))
}

async fn create<T: OrderedResource>(
    State(store): State<OrderedCollection<T>>,
    WithRejection(Json(payload), _): WithRejection<Json<ResourcePayload<T::Payload>>, ApiError>,
) -> Result<(StatusCode, Json<Entry<T>>), ApiError> {
    let entry = store.create(payload)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update<T: OrderedResource>(
    State(store): State<OrderedCollection<T>>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ResourcePayload<T::Payload>>, ApiError>,
) -> Result<Json<Entry<T>>, ApiError> {
    Ok(Json(store.update(&id, payload)?))
}

async fn remove<T: OrderedResource>(
    State(store): State<OrderedCollection<T>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    store.delete(&id)?;
    Ok(Json(json!({ "message": format!("{} deleted", T::LABEL) })))
}

async fn remove_all<T: OrderedResource>(
    State(store): State<OrderedCollection<T>>,
) -> Result<Json<Value>, ApiError> {
    store.delete_all()?;
    Ok(Json(json!({ "message": format!("All {} deleted", T::COLLECTION) })))
}

/// PATCH `/reorder` with `{"order": [{"id": "...", "order": 0}, ...]}`
async fn reorder<T: OrderedResource>(
    State(store): State<OrderedCollection<T>>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, ApiError>,
) -> Result<Json<Vec<Entry<T>>>, ApiError> {
    let entries = parse_reorder(&body)?;
    Ok(Json(store.reorder(&entries)?))
}

fn parse_reorder(body: &Value) -> Result<Vec<ReorderEntry>, ApiError> {
    let items = body
        .get("order")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ApiError::InvalidPayload(EMPTY_ORDER.to_string()))?;

    items
        .iter()
        .map(|item| ReorderEntry::deserialize(item))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ApiError::InvalidPayload(MALFORMED_ORDER_ENTRY.to_string()))
}
