//! User administration: listing, partial updates, deletion.
//!
//! Registration and login live in [`crate::auth`].

use kvartal_core::error::CoreError;
use kvartal_core::types::DbId;
use kvartal_db::models::status::Role;
use kvartal_db::models::user::{UpdateUser, UserFilter, UserPublic};
use kvartal_db::repositories::UserRepo;
use kvartal_db::DbPool;
use serde::Deserialize;

use crate::auth::password;
use crate::error::ServiceResult;

/// Partial user update. A supplied password is re-hashed before storage;
/// an email change is re-checked for uniqueness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserData {
    pub name: Option<String>,
    pub org_name: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// CRUD operations over users for administrative callers.
pub struct UserService {
    pool: DbPool,
}

impl UserService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List users matching the filter. Password hashes never leave this layer.
    pub async fn list_users(&self, filter: &UserFilter) -> ServiceResult<Vec<UserPublic>> {
        let mut conn = self.pool.acquire().await?;
        let users = UserRepo::list(&mut conn, filter).await?;
        Ok(users.into_iter().map(UserPublic::from).collect())
    }

    /// Fetch a single user by id.
    pub async fn get_user(&self, id: DbId) -> ServiceResult<UserPublic> {
        let mut conn = self.pool.acquire().await?;
        let user = UserRepo::find_by_id(&mut conn, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "user", id })?;
        Ok(user.into())
    }

    /// Apply a partial update to a user.
    pub async fn update_user(&self, id: DbId, data: UpdateUserData) -> ServiceResult<UserPublic> {
        let mut tx = self.pool.begin().await?;

        let existing = UserRepo::find_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "user", id })?;

        if let Some(email) = &data.email {
            if *email != existing.email
                && UserRepo::find_by_email(&mut tx, email).await?.is_some()
            {
                return Err(CoreError::DuplicateEmail.into());
            }
        }

        let password_hash = match &data.password {
            Some(password) => Some(
                password::hash_password(password)
                    .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?,
            ),
            None => None,
        };

        let updated = UserRepo::update(
            &mut tx,
            id,
            &UpdateUser {
                name: data.name,
                org_name: data.org_name,
                role: data.role,
                email: data.email,
                password_hash,
            },
        )
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?;

        tx.commit().await?;
        Ok(updated.into())
    }

    /// Delete a user by id.
    pub async fn delete_user(&self, id: DbId) -> ServiceResult<()> {
        let mut conn = self.pool.acquire().await?;
        UserRepo::find_by_id(&mut conn, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "user", id })?;
        UserRepo::delete(&mut conn, id).await?;
        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}
