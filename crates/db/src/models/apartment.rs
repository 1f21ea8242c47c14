//! Apartment entity model and DTOs.

use kvartal_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An apartment row from the `apartments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Apartment {
    pub id: DbId,
    pub id_house: DbId,
    pub id_category: DbId,
    pub name: String,
    pub description: Option<String>,
    pub rooms: i32,
    /// Living area in square metres.
    pub area: Decimal,
    /// How many units of this layout the house offers.
    pub unit_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new apartment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApartment {
    pub id_house: DbId,
    pub id_category: DbId,
    pub name: String,
    pub description: Option<String>,
    pub rooms: i32,
    pub area: Decimal,
    /// Defaults to 1 if omitted.
    pub unit_count: Option<i32>,
}

/// DTO for updating an existing apartment. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApartment {
    pub id_category: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub rooms: Option<i32>,
    pub area: Option<Decimal>,
    pub unit_count: Option<i32>,
}

/// Exact-match listing filter for apartments.
#[derive(Debug, Clone, Default)]
pub struct ApartmentFilter {
    pub id_house: Option<DbId>,
    pub id_category: Option<DbId>,
    pub name: Option<String>,
    pub rooms: Option<i32>,
    /// Narrow to apartments carrying this exact (parameter, value) link.
    pub parameter: Option<ParameterValueFilter>,
}

/// Link-based narrowing for [`ApartmentFilter`].
#[derive(Debug, Clone)]
pub struct ParameterValueFilter {
    pub id_parameter: DbId,
    pub value: String,
}
