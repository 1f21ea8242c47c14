//! Construction order model and DTOs.

use chrono::NaiveDate;
use kvartal_core::types::DbId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::OrderStatus;

/// An order row from the `orders` table.
///
/// Lifecycle date stamps are forward-only: each is set by the corresponding
/// status transition and never cleared afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub id_user: DbId,
    pub id_house: DbId,
    pub status: OrderStatus,
    pub contract_price: Decimal,
    pub create_date: NaiveDate,
    pub update_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub sign_off_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
}

/// DTO for inserting a new order row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub id_user: DbId,
    pub id_house: DbId,
    pub status: OrderStatus,
    pub contract_price: Decimal,
    pub create_date: NaiveDate,
}

/// DTO for the partial order update. Date stamps merge via COALESCE, so a
/// `None` never clears a stamp already set by an earlier transition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
    pub contract_price: Option<Decimal>,
    pub update_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub sign_off_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
}

/// Exact-match listing filter for orders.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub id_user: Option<DbId>,
    pub id_house: Option<DbId>,
    pub status: Option<OrderStatus>,
}
