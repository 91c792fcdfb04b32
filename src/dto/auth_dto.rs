use crate::model::user::User;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::first_validation_message;

const INVALID_EMAIL: &str = "Please enter a valid email address";

/// `local@domain.tld`: no whitespace, one `@`, and a dot inside the domain.
pub fn has_dotted_domain(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn check_email(email: &Option<String>) -> Result<(), String> {
    match email.as_deref() {
        Some(email) if !has_dotted_domain(email) => Err(INVALID_EMAIL.to_string()),
        _ => Ok(()),
    }
}

/// Missing and blank values are treated alike.
fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn has_required_fields(&self) -> bool {
        present(&self.name) && present(&self.email) && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Email is checked before password length.
    pub const FIELD_PRIORITY: [&'static str; 2] = ["email", "password"];

    /// First failing rule as a client-facing message.
    pub fn check(&self) -> Result<(), String> {
        check_email(&self.email)?;
        self.validate()
            .map_err(|errors| first_validation_message(&errors, &Self::FIELD_PRIORITY))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn has_required_fields(&self) -> bool {
        present(&self.email) && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn has_required_fields(&self) -> bool {
        present(&self.name) && present(&self.email)
    }

    pub const FIELD_PRIORITY: [&'static str; 1] = ["email"];

    pub fn check(&self) -> Result<(), String> {
        check_email(&self.email)?;
        self.validate()
            .map_err(|errors| first_validation_message(&errors, &Self::FIELD_PRIORITY))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, message = "New password must be at least 6 characters long"))]
    pub new_password: Option<String>,
}

impl ChangePasswordRequest {
    pub fn has_required_fields(&self) -> bool {
        self.current_password.as_deref().is_some_and(|p| !p.is_empty())
            && self.new_password.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub const FIELD_PRIORITY: [&'static str; 1] = ["new_password"];
}

/// Public view of an account; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
    pub created_at: Option<String>,
    pub last_login: Option<String>,
}

fn iso(dt: Option<bson::DateTime>) -> Option<String> {
    dt.map(|d| d.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        ProfileResponse {
            id: user.id_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            avatar: user.avatar.clone(),
            created_at: iso(user.created_at),
            last_login: iso(user.last_login),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Returned by register and login so handlers can pick the status and message.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub response: AuthResponse,
    pub demo: bool,
}
