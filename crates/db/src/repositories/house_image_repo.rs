//! Repository for the `house_images` table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::image::HouseImage;

/// Provides CRUD operations for house gallery images.
pub struct HouseImageRepo;

impl HouseImageRepo {
    /// Insert an image row for a house.
    pub async fn create(
        conn: &mut PgConnection,
        id_house: DbId,
        image: &str,
    ) -> Result<HouseImage, sqlx::Error> {
        sqlx::query_as::<_, HouseImage>(
            "INSERT INTO house_images (id_house, image)
             VALUES ($1, $2)
             RETURNING id, id_house, image",
        )
        .bind(id_house)
        .bind(image)
        .fetch_one(conn)
        .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<HouseImage>, sqlx::Error> {
        sqlx::query_as::<_, HouseImage>(
            "SELECT id, id_house, image FROM house_images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// List all images for a house, ordered by id ascending.
    pub async fn list_by_house(
        conn: &mut PgConnection,
        id_house: DbId,
    ) -> Result<Vec<HouseImage>, sqlx::Error> {
        sqlx::query_as::<_, HouseImage>(
            "SELECT id, id_house, image FROM house_images WHERE id_house = $1 ORDER BY id",
        )
        .bind(id_house)
        .fetch_all(conn)
        .await
    }

    /// Delete an image row by ID. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM house_images WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bulk-delete every image row for a house. Returns the removed count.
    pub async fn delete_by_house(
        conn: &mut PgConnection,
        id_house: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM house_images WHERE id_house = $1")
            .bind(id_house)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
