use serde::Deserialize;
use uuid::Uuid;

pub type UserId = Uuid;

pub mod auth;
pub mod password;

/// Signup validation, mirroring the username/password rules of the login form.
pub mod rules {
    pub const MAX_USERNAME_LENGTH: usize = 150;
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
    }
}
