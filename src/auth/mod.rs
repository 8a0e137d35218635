pub mod extractors;
pub mod guard;
pub mod password;
pub mod token;

use serde::Deserialize;
use validator::Validate;

// Re-export necessary items
pub use extractors::Authenticated;
pub use guard::AuthGuard;
pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, Claims, AUTH_PURPOSE};

/// Email + password pair accepted by both registration and login.
///
/// These are the only two fields either endpoint accepts; a body carrying
/// anything else is rejected at deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    /// Login key. Must be email-shaped.
    #[validate(email)]
    pub email: String,
    /// Write-only; only its bcrypt hash is ever persisted.
    #[validate(length(min = 6))]
    pub password: String,
}
