use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: String,
    #[serde(rename = "isActive", default = "default_active")]
    pub is_active: bool,
    #[serde(rename = "lastLogin", default)]
    pub last_login: Option<bson::DateTime>,
    #[serde(rename = "emailVerified", default)]
    pub email_verified: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<bson::DateTime>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<bson::DateTime>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// Partial update applied with `$set`; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub last_login: Option<bson::DateTime>,
}

impl UserUpdate {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(ref name) = self.name {
            user.name = name.clone();
        }
        if let Some(ref email) = self.email {
            user.email = email.clone();
        }
        if let Some(ref hash) = self.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(last_login) = self.last_login {
            user.last_login = Some(last_login);
        }
        user.updated_at = Some(bson::DateTime::now());
    }
}
