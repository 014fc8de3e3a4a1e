//! Password Hashing
//! Mission: Explicit hash-then-store; plaintext never reaches the store

use crate::error::StoreError;
use bcrypt::{hash, verify};

/// bcrypt work factor for stored credentials
pub const PASSWORD_HASH_COST: u32 = 10;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Reject empty or short passwords before hashing
pub fn validate_password(password: &str) -> Result<(), StoreError> {
    if password.is_empty() {
        return Err(StoreError::validation("Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StoreError::validation(
            "Password must be at least 6 characters.",
        ));
    }
    Ok(())
}

/// Validate and hash a plaintext password with a fresh salt
pub fn hash_password(password: &str, cost: u32) -> Result<String, StoreError> {
    validate_password(password)?;
    Ok(hash(password, cost)?)
}

/// Compare a plaintext password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, StoreError> {
    Ok(verify(password, password_hash)?)
}
