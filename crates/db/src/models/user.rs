//! User entity model and DTOs.

use kvartal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::Role;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this outward directly.
/// Use [`UserPublic`] for anything that leaves the service layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub org_name: Option<String>,
    pub role: Role,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for presentation output (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: DbId,
    pub name: String,
    pub org_name: Option<String>,
    pub role: Role,
    pub email: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        UserPublic {
            id: user.id,
            name: user.name,
            org_name: user.org_name,
            role: user.role,
            email: user.email,
        }
    }
}

/// DTO for inserting a new user row. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub org_name: Option<String>,
    pub role: Role,
    pub email: String,
    pub password_hash: String,
}

/// DTO for updating an existing user. All fields are optional; the password
/// hash is replaced only when a new password was supplied.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub org_name: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Exact-match listing filter for users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub org_name: Option<String>,
}
