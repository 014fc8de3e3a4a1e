//! Portfolio Backend Library
//!
//! REST API for a personal portfolio: accounts and bearer-token auth,
//! curated project and qualification listings, contact messages and a
//! GitHub repository lookup. Exposed as a library for the binary, the
//! integration tests and the typed client.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod contacts;
pub mod db;
pub mod error;
pub mod github;
pub mod middleware;
pub mod resources;
pub mod seed;
pub mod validation;

pub use api::{create_router, AppState};
pub use error::{ApiError, StoreError};
