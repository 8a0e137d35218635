use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// One-way transform of a plaintext password to its stored hash.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Store(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored hash.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::Store(format!("Failed to verify password: {}", e)))
}
