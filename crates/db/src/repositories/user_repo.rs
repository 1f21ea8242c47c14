//! Repository for the `users` table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};

const COLUMNS: &str = "id, name, org_name, role, email, password_hash, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// The email's uniqueness is enforced by `uq_users_email`; the service
    /// layer checks first so the violation surfaces as a domain error.
    pub async fn create(conn: &mut PgConnection, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, org_name, role, email, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.org_name)
            .bind(input.role)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(conn)
            .await
    }

    /// Find a user by its internal ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a user by email (unique).
    pub async fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(conn)
            .await
    }

    /// List users matching the exact-match conjunction of all given filter
    /// fields, ordered by id ascending.
    pub async fn list(conn: &mut PgConnection, filter: &UserFilter) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR name = $1)
               AND ($2::user_role IS NULL OR role = $2)
               AND ($3::TEXT IS NULL OR org_name = $3)
             ORDER BY id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&filter.name)
            .bind(filter.role)
            .bind(&filter.org_name)
            .fetch_all(conn)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                org_name = COALESCE($3, org_name),
                role = COALESCE($4, role),
                email = COALESCE($5, email),
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.org_name)
            .bind(input.role)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_optional(conn)
            .await
    }

    /// Delete a user by ID. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
