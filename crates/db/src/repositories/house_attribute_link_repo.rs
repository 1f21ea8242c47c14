//! Repository for the `house_attribute_links` association table.
//!
//! Links carry a per-pair `value`; the (id_house, id_attribute) composite
//! key admits at most one value per pair. `reconcile` applies the additive
//! diff used by house updates: values of already-linked attributes are
//! updated in place, missing links are inserted, and links absent from the
//! desired set are left untouched.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::link::{HouseAttributeLink, LinkValue};

const COLUMNS: &str = "id_house, id_attribute, value";

/// Provides link CRUD and reconciliation for house attributes.
pub struct HouseAttributeLinkRepo;

impl HouseAttributeLinkRepo {
    /// List all attribute links for a house, ordered by attribute id.
    pub async fn list_by_house(
        conn: &mut PgConnection,
        id_house: DbId,
    ) -> Result<Vec<HouseAttributeLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM house_attribute_links
             WHERE id_house = $1 ORDER BY id_attribute"
        );
        sqlx::query_as::<_, HouseAttributeLink>(&query)
            .bind(id_house)
            .fetch_all(conn)
            .await
    }

    /// Find a single link by its composite key.
    pub async fn find(
        conn: &mut PgConnection,
        id_house: DbId,
        id_attribute: DbId,
    ) -> Result<Option<HouseAttributeLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM house_attribute_links
             WHERE id_house = $1 AND id_attribute = $2"
        );
        sqlx::query_as::<_, HouseAttributeLink>(&query)
            .bind(id_house)
            .bind(id_attribute)
            .fetch_optional(conn)
            .await
    }

    /// Insert a new link row.
    pub async fn insert(
        conn: &mut PgConnection,
        id_house: DbId,
        id_attribute: DbId,
        value: &str,
    ) -> Result<HouseAttributeLink, sqlx::Error> {
        let query = format!(
            "INSERT INTO house_attribute_links (id_house, id_attribute, value)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HouseAttributeLink>(&query)
            .bind(id_house)
            .bind(id_attribute)
            .bind(value)
            .fetch_one(conn)
            .await
    }

    /// Update only the `value` of an existing link, keyed by the composite
    /// key. Returns `true` if a row was updated.
    pub async fn set_value(
        conn: &mut PgConnection,
        id_house: DbId,
        id_attribute: DbId,
        value: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE house_attribute_links SET value = $3
             WHERE id_house = $1 AND id_attribute = $2",
        )
        .bind(id_house)
        .bind(id_attribute)
        .bind(value)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reconcile the house's links against the desired set.
    ///
    /// Existing pairs get a value-only in-place update; absent pairs are
    /// inserted. Links not named in `desired` stay untouched -- removal is an
    /// explicit caller decision via [`Self::remove`]. An empty `desired` set
    /// is a no-op, which is what lets partial updates omit links entirely.
    pub async fn reconcile(
        conn: &mut PgConnection,
        id_house: DbId,
        desired: &[LinkValue],
    ) -> Result<(), sqlx::Error> {
        if desired.is_empty() {
            return Ok(());
        }
        let existing = Self::list_by_house(conn, id_house).await?;
        for entry in desired {
            if existing.iter().any(|link| link.id_attribute == entry.id) {
                Self::set_value(conn, id_house, entry.id, &entry.value).await?;
            } else {
                Self::insert(conn, id_house, entry.id, &entry.value).await?;
            }
        }
        Ok(())
    }

    /// Remove a single link by its composite key. Returns `true` if removed.
    pub async fn remove(
        conn: &mut PgConnection,
        id_house: DbId,
        id_attribute: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM house_attribute_links WHERE id_house = $1 AND id_attribute = $2",
        )
        .bind(id_house)
        .bind(id_attribute)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-delete every link for a house. Returns the removed count.
    pub async fn delete_by_house(
        conn: &mut PgConnection,
        id_house: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM house_attribute_links WHERE id_house = $1")
            .bind(id_house)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Bulk-delete every link referencing an attribute. Returns the removed
    /// count. Used when the attribute itself is deleted (orphan prevention).
    pub async fn delete_by_attribute(
        conn: &mut PgConnection,
        id_attribute: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM house_attribute_links WHERE id_attribute = $1")
            .bind(id_attribute)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
