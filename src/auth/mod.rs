//! Authentication Module
//! Mission: Stateless bearer tokens, salted credentials and role-based guards

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod user_store;

pub use api::AuthState;
pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, require_admin, require_self_or_admin};
pub use user_store::UserStore;
