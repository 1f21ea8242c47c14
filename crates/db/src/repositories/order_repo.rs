//! Repository for the `orders` table.

use kvartal_core::types::DbId;
use sqlx::PgConnection;

use crate::models::order::{CreateOrder, Order, OrderFilter, UpdateOrder};

const COLUMNS: &str = "id, id_user, id_house, status, contract_price, create_date, \
     update_date, payment_date, sign_off_date, completion_date";

/// Provides CRUD operations for construction orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order, returning the created row.
    pub async fn create(conn: &mut PgConnection, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (id_user, id_house, status, contract_price, create_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.id_user)
            .bind(input.id_house)
            .bind(input.status)
            .bind(input.contract_price)
            .bind(input.create_date)
            .fetch_one(conn)
            .await
    }

    /// Find an order by its internal ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List orders matching the exact-match conjunction of all given filter
    /// fields, ordered by id ascending.
    pub async fn list(conn: &mut PgConnection, filter: &OrderFilter) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE ($1::BIGINT IS NULL OR id_user = $1)
               AND ($2::BIGINT IS NULL OR id_house = $2)
               AND ($3::order_status IS NULL OR status = $3)
             ORDER BY id"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(filter.id_user)
            .bind(filter.id_house)
            .bind(filter.status)
            .fetch_all(conn)
            .await
    }

    /// Update an order. Only non-`None` fields in `input` are applied.
    ///
    /// Date stamps merge via COALESCE, so a stamp already set by an earlier
    /// transition survives every later update. Returns `None` if no row with
    /// the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateOrder,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                status = COALESCE($2, status),
                contract_price = COALESCE($3, contract_price),
                update_date = COALESCE($4, update_date),
                payment_date = COALESCE($5, payment_date),
                sign_off_date = COALESCE($6, sign_off_date),
                completion_date = COALESCE($7, completion_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(input.status)
            .bind(input.contract_price)
            .bind(input.update_date)
            .bind(input.payment_date)
            .bind(input.sign_off_date)
            .bind(input.completion_date)
            .fetch_optional(conn)
            .await
    }

    /// Delete an order by ID. Returns `true` if a row was removed.
    ///
    /// The bound house is left standing.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
