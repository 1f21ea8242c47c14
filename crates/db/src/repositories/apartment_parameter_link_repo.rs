//! Repository for the `apartment_parameter_links` association table.
//!
//! Mirrors the house-attribute link repo: per-pair `value`, composite key,
//! additive reconciliation.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::link::{ApartmentParameterLink, LinkValue};

const COLUMNS: &str = "id_apartment, id_parameter, value";

/// Provides link CRUD and reconciliation for apartment parameters.
pub struct ApartmentParameterLinkRepo;

impl ApartmentParameterLinkRepo {
    /// List all parameter links for an apartment, ordered by parameter id.
    pub async fn list_by_apartment(
        conn: &mut PgConnection,
        id_apartment: DbId,
    ) -> Result<Vec<ApartmentParameterLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM apartment_parameter_links
             WHERE id_apartment = $1 ORDER BY id_parameter"
        );
        sqlx::query_as::<_, ApartmentParameterLink>(&query)
            .bind(id_apartment)
            .fetch_all(conn)
            .await
    }

    /// Find a single link by its composite key.
    pub async fn find(
        conn: &mut PgConnection,
        id_apartment: DbId,
        id_parameter: DbId,
    ) -> Result<Option<ApartmentParameterLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM apartment_parameter_links
             WHERE id_apartment = $1 AND id_parameter = $2"
        );
        sqlx::query_as::<_, ApartmentParameterLink>(&query)
            .bind(id_apartment)
            .bind(id_parameter)
            .fetch_optional(conn)
            .await
    }

    /// Insert a new link row.
    pub async fn insert(
        conn: &mut PgConnection,
        id_apartment: DbId,
        id_parameter: DbId,
        value: &str,
    ) -> Result<ApartmentParameterLink, sqlx::Error> {
        let query = format!(
            "INSERT INTO apartment_parameter_links (id_apartment, id_parameter, value)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApartmentParameterLink>(&query)
            .bind(id_apartment)
            .bind(id_parameter)
            .bind(value)
            .fetch_one(conn)
            .await
    }

    /// Update only the `value` of an existing link. Returns `true` if updated.
    pub async fn set_value(
        conn: &mut PgConnection,
        id_apartment: DbId,
        id_parameter: DbId,
        value: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE apartment_parameter_links SET value = $3
             WHERE id_apartment = $1 AND id_parameter = $2",
        )
        .bind(id_apartment)
        .bind(id_parameter)
        .bind(value)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reconcile the apartment's links against the desired set.
    ///
    /// Same additive semantics as the house variant: update values in place,
    /// insert missing pairs, never remove pairs the caller did not name.
    pub async fn reconcile(
        conn: &mut PgConnection,
        id_apartment: DbId,
        desired: &[LinkValue],
    ) -> Result<(), sqlx::Error> {
        if desired.is_empty() {
            return Ok(());
        }
        let existing = Self::list_by_apartment(conn, id_apartment).await?;
        for entry in desired {
            if existing.iter().any(|link| link.id_parameter == entry.id) {
                Self::set_value(conn, id_apartment, entry.id, &entry.value).await?;
            } else {
                Self::insert(conn, id_apartment, entry.id, &entry.value).await?;
            }
        }
        Ok(())
    }

    /// Remove a single link by its composite key. Returns `true` if removed.
    pub async fn remove(
        conn: &mut PgConnection,
        id_apartment: DbId,
        id_parameter: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM apartment_parameter_links
             WHERE id_apartment = $1 AND id_parameter = $2",
        )
        .bind(id_apartment)
        .bind(id_parameter)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-delete every link for an apartment. Returns the removed count.
    pub async fn delete_by_apartment(
        conn: &mut PgConnection,
        id_apartment: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartment_parameter_links WHERE id_apartment = $1")
            .bind(id_apartment)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Bulk-delete every link referencing a parameter. Returns the removed
    /// count. Used when the parameter itself is deleted (orphan prevention).
    pub async fn delete_by_parameter(
        conn: &mut PgConnection,
        id_parameter: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartment_parameter_links WHERE id_parameter = $1")
            .bind(id_parameter)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
