//! Repository for the `apartments` table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::apartment::{Apartment, ApartmentFilter, CreateApartment, UpdateApartment};

const COLUMNS: &str = "id, id_house, id_category, name, description, rooms, area, unit_count, \
     created_at, updated_at";

/// Provides CRUD operations for apartments.
pub struct ApartmentRepo;

impl ApartmentRepo {
    /// Insert a new apartment, returning the created row.
    ///
    /// If `unit_count` is `None`, defaults to 1.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateApartment,
    ) -> Result<Apartment, sqlx::Error> {
        let query = format!(
            "INSERT INTO apartments
                 (id_house, id_category, name, description, rooms, area, unit_count)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Apartment>(&query)
            .bind(input.id_house)
            .bind(input.id_category)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.rooms)
            .bind(input.area)
            .bind(input.unit_count)
            .fetch_one(conn)
            .await
    }

    /// Find an apartment by its internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments WHERE id = $1");
        sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List apartments matching the exact-match conjunction of all given
    /// filter fields, ordered by id ascending.
    ///
    /// When `filter.parameter` is set, the result is narrowed to apartments
    /// having a link row with that exact (parameter, value) pair.
    pub async fn list(
        conn: &mut PgConnection,
        filter: &ApartmentFilter,
    ) -> Result<Vec<Apartment>, sqlx::Error> {
        let (id_parameter, parameter_value) = match &filter.parameter {
            Some(f) => (Some(f.id_parameter), Some(f.value.clone())),
            None => (None, None),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM apartments
             WHERE ($1::BIGINT IS NULL OR id_house = $1)
               AND ($2::BIGINT IS NULL OR id_category = $2)
               AND ($3::TEXT IS NULL OR name = $3)
               AND ($4::INTEGER IS NULL OR rooms = $4)
               AND ($5::BIGINT IS NULL OR EXISTS (
                        SELECT 1 FROM apartment_parameter_links l
                        WHERE l.id_apartment = apartments.id
                          AND l.id_parameter = $5
                          AND l.value = $6))
             ORDER BY id"
        );
        sqlx::query_as::<_, Apartment>(&query)
            .bind(filter.id_house)
            .bind(filter.id_category)
            .bind(&filter.name)
            .bind(filter.rooms)
            .bind(id_parameter)
            .bind(parameter_value)
            .fetch_all(conn)
            .await
    }

    /// List all apartments belonging to a house, ordered by id ascending.
    pub async fn list_by_house(
        conn: &mut PgConnection,
        id_house: DbId,
    ) -> Result<Vec<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments WHERE id_house = $1 ORDER BY id");
        sqlx::query_as::<_, Apartment>(&query)
            .bind(id_house)
            .fetch_all(conn)
            .await
    }

    /// Update an apartment. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateApartment,
    ) -> Result<Option<Apartment>, sqlx::Error> {
        let query = format!(
            "UPDATE apartments SET
                id_category = COALESCE($2, id_category),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                rooms = COALESCE($5, rooms),
                area = COALESCE($6, area),
                unit_count = COALESCE($7, unit_count),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .bind(input.id_category)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.rooms)
            .bind(input.area)
            .bind(input.unit_count)
            .fetch_optional(conn)
            .await
    }

    /// Delete an apartment by ID. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartments WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-delete every apartment under a house. Returns the removed count.
    ///
    /// Used by the house cascade after per-apartment dependents are gone.
    pub async fn delete_by_house(
        conn: &mut PgConnection,
        id_house: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartments WHERE id_house = $1")
            .bind(id_house)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
