//! Apartment parameter lookup entity.

use kvartal_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `apartment_parameters` catalog table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Parameter {
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateParameter {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateParameter {
    pub name: Option<String>,
}
