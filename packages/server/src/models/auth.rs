use serde::{Deserialize, Serialize};

use crate::entity::role::BACK_OFFICE_ROLES;
use crate::entity::user;
use crate::error::AppError;

const USERNAME_MAX_CHARS: usize = 32;
const PASSWORD_BYTES: std::ops::RangeInclusive<usize> = 8..=128;

/// Username and password, used both to register and to log in.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct Credentials {
    /// 1-32 letters, digits or underscores. Surrounding whitespace is ignored.
    #[schema(example = "ada_lovelace")]
    pub username: String,
    /// 8-128 bytes when registering.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

impl Credentials {
    pub fn username(&self) -> &str {
        self.username.trim()
    }

    /// Rules for a new account.
    pub fn validate_new(&self) -> Result<(), AppError> {
        let username = self.username();
        if username.is_empty() || username.chars().count() > USERNAME_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "Username must be 1-{USERNAME_MAX_CHARS} characters"
            )));
        }
        if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AppError::Validation(
                "Username may only contain letters, digits and underscores".into(),
            ));
        }
        if !PASSWORD_BYTES.contains(&self.password.len()) {
            return Err(AppError::Validation(format!(
                "Password must be {}-{} characters",
                PASSWORD_BYTES.start(),
                PASSWORD_BYTES.end()
            )));
        }
        Ok(())
    }

    /// Login only needs both fields filled in; wrong values surface as
    /// `INVALID_CREDENTIALS`.
    pub fn validate_present(&self) -> Result<(), AppError> {
        if self.username().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".into(),
            ));
        }
        Ok(())
    }
}

/// A freshly registered account.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "ada_lovelace")]
    pub username: String,
    /// Always `member` for self-registered accounts.
    #[schema(example = "member")]
    pub role: String,
}

impl From<user::Model> for AccountResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Where the client navigates once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum Landing {
    /// Back-office dashboard.
    #[serde(rename = "/admin")]
    Dashboard,
    /// Public site.
    #[serde(rename = "/")]
    Home,
}

impl Landing {
    pub fn for_role(role: &str) -> Self {
        if BACK_OFFICE_ROLES.contains(&role) {
            Landing::Dashboard
        } else {
            Landing::Home
        }
    }
}

/// A signed-in session.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    /// Bearer token, valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "ada_lovelace")]
    pub username: String,
    #[schema(example = "editor")]
    pub role: String,
    #[schema(example = json!(["content:edit", "content:delete"]))]
    pub permissions: Vec<String>,
    pub redirect: Landing,
}

/// The caller as seen through their token.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "ada_lovelace")]
    pub username: String,
    #[schema(example = "editor")]
    pub role: String,
    #[schema(example = json!(["content:edit"]))]
    pub permissions: Vec<String>,
    pub redirect: Landing,
}
