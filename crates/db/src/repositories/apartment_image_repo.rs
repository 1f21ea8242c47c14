//! Repository for the `apartment_images` table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::image::ApartmentImage;

/// Provides CRUD operations for apartment gallery images.
pub struct ApartmentImageRepo;

impl ApartmentImageRepo {
    /// Insert an image row for an apartment.
    pub async fn create(
        conn: &mut PgConnection,
        id_apartment: DbId,
        image: &str,
    ) -> Result<ApartmentImage, sqlx::Error> {
        sqlx::query_as::<_, ApartmentImage>(
            "INSERT INTO apartment_images (id_apartment, image)
             VALUES ($1, $2)
             RETURNING id, id_apartment, image",
        )
        .bind(id_apartment)
        .bind(image)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ApartmentImage>, sqlx::Error> {
        sqlx::query_as::<_, ApartmentImage>(
            "SELECT id, id_apartment, image FROM apartment_images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// List all images for an apartment, ordered by id ascending.
    pub async fn list_by_apartment(
        conn: &mut PgConnection,
        id_apartment: DbId,
    ) -> Result<Vec<ApartmentImage>, sqlx::Error> {
        sqlx::query_as::<_, ApartmentImage>(
            "SELECT id, id_apartment, image FROM apartment_images
             WHERE id_apartment = $1 ORDER BY id",
        )
        .bind(id_apartment)
        .fetch_all(conn)
        .await
    }

    /// Delete an image row by ID. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartment_images WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-delete every image row for an apartment. Returns the removed count.
    pub async fn delete_by_apartment(
        conn: &mut PgConnection,
        id_apartment: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM apartment_images WHERE id_apartment = $1")
            .bind(id_apartment)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
