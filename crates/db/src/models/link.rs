//! Association rows: many-to-many links carrying a per-pair value.

use kvartal_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A (house, attribute) link with its value, e.g. ("district class", "Central").
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HouseAttributeLink {
    pub id_house: DbId,
    pub id_attribute: DbId,
    pub value: String,
}

/// An (apartment, parameter) link with its value, e.g. ("ceiling height", "2.8").
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApartmentParameterLink {
    pub id_apartment: DbId,
    pub id_parameter: DbId,
    pub value: String,
}

/// A desired link entry submitted to reconciliation: the linked entity's id
/// plus the value the link should carry for the parent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkValue {
    pub id: DbId,
    pub value: String,
}
