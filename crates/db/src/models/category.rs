//! Apartment category lookup entity.

use kvartal_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `apartment_categories` catalog table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApartmentCategory {
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
}
