//! Repository for the `attributes` catalog table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::attribute::{Attribute, CreateAttribute, UpdateAttribute};

/// Provides CRUD operations for the house attribute catalog.
pub struct AttributeRepo;

impl AttributeRepo {
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateAttribute,
    ) -> Result<Attribute, sqlx::Error> {
        sqlx::query_as::<_, Attribute>(
            "INSERT INTO attributes (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Attribute>, sqlx::Error> {
        sqlx::query_as::<_, Attribute>("SELECT id, name FROM attributes WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List attributes, optionally restricted to an exact name match.
    pub async fn list(
        conn: &mut PgConnection,
        name: Option<&str>,
    ) -> Result<Vec<Attribute>, sqlx::Error> {
        sqlx::query_as::<_, Attribute>(
            "SELECT id, name FROM attributes
             WHERE ($1::TEXT IS NULL OR name = $1)
             ORDER BY id",
        )
        .bind(name)
        .fetch_all(conn)
        .await
    }

    /// Update an attribute. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateAttribute,
    ) -> Result<Option<Attribute>, sqlx::Error> {
        sqlx::query_as::<_, Attribute>(
            "UPDATE attributes SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING id, name",
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(conn)
        .await
    }

    /// Delete an attribute by ID. Returns `true` if a row was removed.
    ///
    /// Link rows referencing the attribute must be removed first.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attributes WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
