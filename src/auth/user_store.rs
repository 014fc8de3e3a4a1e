//! User Storage
//! Mission: Securely store and manage user accounts with SQLite

use crate::auth::models::{NewUser, User, UserRole, UserUpdate};
use crate::auth::password::{hash_password, verify_password, PASSWORD_HASH_COST};
use crate::db::{decode_id, decode_timestamp, encode_timestamp, Database};
use crate::error::StoreError;
use crate::validation::{normalize_email, required};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::{info, warn};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// Credential store. Policy-agnostic: callers decide who may change what.
#[derive(Clone)]
pub struct UserStore {
    db: Database,
    hash_cost: u32,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            hash_cost: PASSWORD_HASH_COST,
        }
    }

    /// Override the bcrypt cost (tests use the minimum)
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Create a new account with the default `user` role
    pub fn create(&self, new_user: &NewUser) -> Result<User, StoreError> {
        self.create_with_role(new_user, UserRole::User)
    }

    /// Create an account with an explicit role (seeding only)
    pub fn create_with_role(&self, new_user: &NewUser, role: UserRole) -> Result<User, StoreError> {
        let name = required(Some(new_user.name.as_str()), "Name is required")?;
        let email = normalize_email(
            Some(new_user.email.as_str()),
            "Email is required",
            "Please fill a valid email address",
        )?;
        let password_hash = hash_password(&new_user.password, self.hash_cost)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        };

        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.role.as_str(),
                encode_timestamp(&user.created_at),
                encode_timestamp(&user.updated_at),
            ],
        )
        .map_err(map_unique_violation)?;

        info!(user_id = %user.id, role = user.role.as_str(), "✅ Created user");

        Ok(user)
    }

    /// Check credentials. Unknown email and wrong password fail identically.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, StoreError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.find_by_email(&email)? else {
            warn!("❌ Sign-in for unknown account");
            return Err(StoreError::AuthenticationFailed);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "❌ Sign-in with wrong password");
            return Err(StoreError::AuthenticationFailed);
        }

        Ok(user)
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let conn = self.db.lock();
        select_one(&conn, "id", &id.to_string())
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let conn = self.db.lock();
        select_one(&conn, "email", &email.trim().to_lowercase())
    }

    /// List all users (admin only)
    pub fn list(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Merge provided fields over the stored record, re-hashing a new password
    pub fn update(&self, id: Uuid, changes: &UserUpdate) -> Result<User, StoreError> {
        let mut user = self
            .find_by_id(id)?
            .ok_or_else(|| StoreError::not_found("User"))?;

        if let Some(name) = changes.name.as_deref() {
            user.name = required(Some(name), "Name is required")?;
        }
        if let Some(email) = changes.email.as_deref() {
            user.email = normalize_email(
                Some(email),
                "Email is required",
                "Please fill a valid email address",
            )?;
        }
        if let Some(password) = changes.password.as_deref() {
            user.password_hash = hash_password(password, self.hash_cost)?;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        let conn = self.db.lock();
        let rows = conn
            .execute(
                "UPDATE users SET name = ?1, email = ?2, password_hash = ?3, role = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    user.name,
                    user.email,
                    user.password_hash,
                    user.role.as_str(),
                    encode_timestamp(&user.updated_at),
                    user.id.to_string(),
                ],
            )
            .map_err(map_unique_violation)?;

        if rows == 0 {
            return Err(StoreError::not_found("User"));
        }

        info!(user_id = %user.id, "✏️  Updated user");
        Ok(user)
    }

    /// Delete a user by ID
    pub fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let conn = self.db.lock();
        let rows = conn.execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;

        if rows == 0 {
            return Err(StoreError::not_found("User"));
        }

        info!(user_id = %id, "🗑️  Deleted user");
        Ok(())
    }

    /// Remove every account; returns how many were deleted
    pub fn delete_all(&self) -> Result<usize, StoreError> {
        let conn = self.db.lock();
        let rows = conn.execute("DELETE FROM users", [])?;
        info!(count = rows, "🗑️  Deleted all users");
        Ok(rows)
    }

    /// Make sure the configured admin account exists and holds the admin role
    pub fn ensure_admin(&self, admin: &NewUser) -> Result<User, StoreError> {
        if let Some(existing) = self.find_by_email(&admin.email)? {
            if existing.role == UserRole::Admin {
                return Ok(existing);
            }
            let elevated = self.update(
                existing.id,
                &UserUpdate {
                    role: Some(UserRole::Admin),
                    ..UserUpdate::default()
                },
            )?;
            info!(email = %elevated.email, "🔐 Elevated existing account to admin");
            return Ok(elevated);
        }

        let user = self.create_with_role(admin, UserRole::Admin)?;
        info!(email = %user.email, "🔐 Seeded default admin user");
        warn!("⚠️  Set ADMIN_PASSWORD before production use");
        Ok(user)
    }
}

fn select_one(conn: &Connection, column: &str, value: &str) -> Result<Option<User>, StoreError> {
    let sql = format!("SELECT {} FROM users WHERE {} = ?1", USER_COLUMNS, column);
    let user = conn
        .query_row(&sql, params![value], user_from_row)
        .optional()?;
    Ok(user)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role_str: String = row.get(4)?;
    Ok(User {
        id: decode_id(&row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: UserRole::parse(&role_str).unwrap_or_default(),
        created_at: decode_timestamp(&row.get::<_, String>(5)?)?,
        updated_at: decode_timestamp(&row.get::<_, String>(6)?)?,
    })
}

fn map_unique_violation(err: rusqlite::Error) -> StoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => StoreError::DuplicateEmail,
        _ => StoreError::Database(err),
    }
}
