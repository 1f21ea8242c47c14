//! House attribute lookup entity.

use kvartal_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `attributes` catalog table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attribute {
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttribute {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttribute {
    pub name: Option<String>,
}
