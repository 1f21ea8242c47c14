//! Repository for the `apartment_categories` catalog table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::category::{ApartmentCategory, CreateCategory, UpdateCategory};

/// Provides CRUD operations for the apartment category catalog.
pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateCategory,
    ) -> Result<ApartmentCategory, sqlx::Error> {
        sqlx::query_as::<_, ApartmentCategory>(
            "INSERT INTO apartment_categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ApartmentCategory>, sqlx::Error> {
        sqlx::query_as::<_, ApartmentCategory>(
            "SELECT id, name FROM apartment_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// List categories, optionally restricted to an exact name match.
    pub async fn list(
        conn: &mut PgConnection,
        name: Option<&str>,
    ) -> Result<Vec<ApartmentCategory>, sqlx::Error> {
        sqlx::query_as::<_, ApartmentCategory>(
            "SELECT id, name FROM apartment_categories
             WHERE ($1::TEXT IS NULL OR name = $1)
             ORDER BY id",
        )
        .bind(name)
        .fetch_all(conn)
        .await
    }

    /// Update a category. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<ApartmentCategory>, sqlx::Error> {
        sqlx::query_as::<_, ApartmentCategory>(
            "UPDATE apartment_categories SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING id, name",
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(conn)
        .await
    }

    /// Delete a category by ID. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartment_categories WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
