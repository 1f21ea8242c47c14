//! Repository for the `apartment_parameters` catalog table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::parameter::{CreateParameter, Parameter, UpdateParameter};

/// Provides CRUD operations for the apartment parameter catalog.
pub struct ParameterRepo;

impl ParameterRepo {
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateParameter,
    ) -> Result<Parameter, sqlx::Error> {
        sqlx::query_as::<_, Parameter>(
            "INSERT INTO apartment_parameters (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Parameter>, sqlx::Error> {
        sqlx::query_as::<_, Parameter>("SELECT id, name FROM apartment_parameters WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List parameters, optionally restricted to an exact name match.
    pub async fn list(
        conn: &mut PgConnection,
        name: Option<&str>,
    ) -> Result<Vec<Parameter>, sqlx::Error> {
        sqlx::query_as::<_, Parameter>(
            "SELECT id, name FROM apartment_parameters
             WHERE ($1::TEXT IS NULL OR name = $1)
             ORDER BY id",
        )
        .bind(name)
        .fetch_all(conn)
        .await
    }

    /// Update a parameter. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateParameter,
    ) -> Result<Option<Parameter>, sqlx::Error> {
        sqlx::query_as::<_, Parameter>(
            "UPDATE apartment_parameters SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING id, name",
        )
        .bind(id)
        .bind(&input.name)
        .fetch_optional(conn)
        .await
    }

    /// Delete a parameter by ID. Returns `true` if a row was removed.
    ///
    /// Link rows referencing the parameter must be removed first.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartment_parameters WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
