//! House entity model and DTOs.

use kvartal_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::HouseStatus;

/// A house row from the `houses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct House {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Main-image filename; gallery images live in `house_images`.
    pub image: Option<String>,
    pub status: HouseStatus,
    /// Set when the house exists as the target of a construction order.
    pub is_order: bool,
    pub district: String,
    pub address: String,
    pub floors: i32,
    pub entrances: i32,
    pub start_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new house.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHouse {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: HouseStatus,
    /// Defaults to `false` if omitted.
    pub is_order: Option<bool>,
    pub district: String,
    pub address: String,
    pub floors: i32,
    /// Defaults to 1 if omitted.
    pub entrances: Option<i32>,
    pub start_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
}

/// DTO for updating an existing house. All fields are optional; only
/// non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHouse {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Option<HouseStatus>,
    pub is_order: Option<bool>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub floors: Option<i32>,
    pub entrances: Option<i32>,
    pub start_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
}

/// Exact-match listing filter. Absent fields are skipped; an empty filter
/// matches all rows.
#[derive(Debug, Clone, Default)]
pub struct HouseFilter {
    pub name: Option<String>,
    pub status: Option<HouseStatus>,
    pub is_order: Option<bool>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub floors: Option<i32>,
    pub entrances: Option<i32>,
    /// Narrow to houses carrying this exact (attribute, value) link.
    pub attribute: Option<AttributeValueFilter>,
}

/// Link-based narrowing for [`HouseFilter`].
#[derive(Debug, Clone)]
pub struct AttributeValueFilter {
    pub id_attribute: DbId,
    pub value: String,
}
