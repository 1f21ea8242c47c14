//! Repository for the `houses` table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::house::{CreateHouse, House, HouseFilter, UpdateHouse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, image, status, is_order, district, address, \
     floors, entrances, start_price, final_price, created_at, updated_at";

/// Provides CRUD operations for houses.
pub struct HouseRepo;

impl HouseRepo {
    /// Insert a new house, returning the created row.
    ///
    /// If `is_order` is `None`, defaults to `false`; `entrances` defaults to 1.
    pub async fn create(conn: &mut PgConnection, input: &CreateHouse) -> Result<House, sqlx::Error> {
        let query = format!(
            "INSERT INTO houses
                 (name, description, image, status, is_order, district, address,
                  floors, entrances, start_price, final_price)
             VALUES ($1, $2, $3, $4, COALESCE($5, FALSE), $6, $7, $8, COALESCE($9, 1), $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, House>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image)
            .bind(input.status)
            .bind(input.is_order)
            .bind(&input.district)
            .bind(&input.address)
            .bind(input.floors)
            .bind(input.entrances)
            .bind(input.start_price)
            .bind(input.final_price)
            .fetch_one(conn)
            .await
    }

    /// Find a house by its internal ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<House>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM houses WHERE id = $1");
        sqlx::query_as::<_, House>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List houses matching the exact-match conjunction of all given filter
    /// fields, ordered by id ascending.
    ///
    /// When `filter.attribute` is set, the result is narrowed to houses
    /// having a link row with that exact (attribute, value) pair.
    pub async fn list(conn: &mut PgConnection, filter: &HouseFilter) -> Result<Vec<House>, sqlx::Error> {
        let (id_attribute, attribute_value) = match &filter.attribute {
            Some(f) => (Some(f.id_attribute), Some(f.value.clone())),
            None => (None, None),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM houses
             WHERE ($1::TEXT IS NULL OR name = $1)
               AND ($2::house_status IS NULL OR status = $2)
               AND ($3::BOOLEAN IS NULL OR is_order = $3)
               AND ($4::TEXT IS NULL OR district = $4)
               AND ($5::TEXT IS NULL OR address = $5)
               AND ($6::INTEGER IS NULL OR floors = $6)
               AND ($7::INTEGER IS NULL OR entrances = $7)
               AND ($8::BIGINT IS NULL OR EXISTS (
                        SELECT 1 FROM house_attribute_links l
                        WHERE l.id_house = houses.id
                          AND l.id_attribute = $8
                          AND l.value = $9))
             ORDER BY id"
        );
        sqlx::query_as::<_, House>(&query)
            .bind(&filter.name)
            .bind(filter.status)
            .bind(filter.is_order)
            .bind(&filter.district)
            .bind(&filter.address)
            .bind(filter.floors)
            .bind(filter.entrances)
            .bind(id_attribute)
            .bind(attribute_value)
            .fetch_all(conn)
            .await
    }

    /// Update a house. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateHouse,
    ) -> Result<Option<House>, sqlx::Error> {
        let query = format!(
            "UPDATE houses SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                image = COALESCE($4, image),
                status = COALESCE($5, status),
                is_order = COALESCE($6, is_order),
                district = COALESCE($7, district),
                address = COALESCE($8, address),
                floors = COALESCE($9, floors),
                entrances = COALESCE($10, entrances),
                start_price = COALESCE($11, start_price),
                final_price = COALESCE($12, final_price),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, House>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image)
            .bind(input.status)
            .bind(input.is_order)
            .bind(&input.district)
            .bind(&input.address)
            .bind(input.floors)
            .bind(input.entrances)
            .bind(input.start_price)
            .bind(input.final_price)
            .fetch_optional(conn)
            .await
    }

    /// Delete a house by ID. Returns `true` if a row was removed.
    ///
    /// Dependents must already be gone; the service layer owns the cascade order.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM houses WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
