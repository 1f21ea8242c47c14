//! Gallery image rows for houses and apartments.

use kvartal_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `house_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HouseImage {
    pub id: DbId,
    pub id_house: DbId,
    /// Stored filename, resolved by the image storage collaborator.
    pub image: String,
}

/// A row from the `apartment_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApartmentImage {
    pub id: DbId,
    pub id_apartment: DbId,
    pub image: String,
}
