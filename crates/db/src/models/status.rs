//! Closed status/role enums bound to the Postgres enum types created in
//! `20260301000001_create_enums.sql`.

use serde::{Deserialize, Serialize};

/// House construction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "house_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HouseStatus {
    Project,
    Planned,
    InProgress,
    Suspended,
    Built,
    ForSale,
    Sold,
    Archived,
}

/// Construction order lifecycle status.
///
/// `Cancelled` is reachable from any non-terminal state; `Sold` is the
/// alternate terminal for pre-built-house purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Approved,
    InProgress,
    AwaitingPayment,
    Paid,
    AwaitingSignOff,
    Signed,
    Completed,
    Cancelled,
    Sold,
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// The wire/claims representation, matching the database enum label.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// Parse a claims string back into a role.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}
