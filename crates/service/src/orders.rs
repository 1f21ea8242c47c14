//! Construction-order lifecycle.
//!
//! Status transitions are accepted as requested (no predecessor table);
//! their side effects -- date stamps and the house status push -- are
//! computed by the pure [`transition_effects`] function and applied in the
//! same transaction as the order update.

use chrono::NaiveDate;
use kvartal_core::error::CoreError;
use kvartal_core::types::DbId;
use kvartal_db::models::house::{CreateHouse, House, UpdateHouse};
use kvartal_db::models::link::LinkValue;
use kvartal_db::models::order::{CreateOrder, Order, OrderFilter, UpdateOrder};
use kvartal_db::models::status::{HouseStatus, OrderStatus};
use kvartal_db::models::user::UserPublic;
use kvartal_db::repositories::{HouseAttributeLinkRepo, HouseRepo, OrderRepo, UserRepo};
use kvartal_db::DbPool;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ServiceResult;

/// Side effects a status transition carries: which date stamps to set and
/// whether the bound house's status must change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionEffects {
    pub payment_date: Option<NaiveDate>,
    pub sign_off_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub house_status: Option<HouseStatus>,
}

/// Compute the side effects of moving an order to `requested` on `today`.
///
/// Paid stamps the payment date, Signed the sign-off date; Completed stamps
/// the completion date and pushes the house to Built. Every other status
/// carries no side effects beyond the always-stamped update date.
pub fn transition_effects(requested: OrderStatus, today: NaiveDate) -> TransitionEffects {
    let mut effects = TransitionEffects::default();
    match requested {
        OrderStatus::Paid => effects.payment_date = Some(today),
        OrderStatus::Signed => effects.sign_off_date = Some(today),
        OrderStatus::Completed => {
            effects.completion_date = Some(today);
            effects.house_status = Some(HouseStatus::Built);
        }
        _ => {}
    }
    effects
}

/// What the order is for: a house to be built, or one that already exists.
#[derive(Debug, Clone)]
pub enum OrderTarget {
    /// Commission a new build. The house is created in the same transaction
    /// with status forced to Project and `is_order` forced true.
    NewBuild {
        house: CreateHouse,
        attributes: Vec<LinkValue>,
    },
    /// Purchase of an existing house.
    Existing { id_house: DbId },
}

/// Creation payload for an order.
#[derive(Debug, Clone)]
pub struct CreateOrderData {
    pub id_user: DbId,
    pub contract_price: Decimal,
    pub target: OrderTarget,
}

/// Partial order update; a status change triggers its transition effects.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrderData {
    pub status: Option<OrderStatus>,
    pub contract_price: Option<Decimal>,
}

/// An order with its user and house resolved for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithRelations {
    #[serde(flatten)]
    pub order: Order,
    pub user: UserPublic,
    pub house: House,
}

/// Manages order CRUD and the lifecycle state machine.
pub struct OrderService {
    pool: DbPool,
}

impl OrderService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create an order, building its house first when the target is a new
    /// build. House insert, link inserts, and order insert commit together;
    /// any failure rolls the whole thing back as [`CoreError::OrderCreationFailed`].
    pub async fn create_order(&self, data: CreateOrderData) -> ServiceResult<Order> {
        let mut tx = self.pool.begin().await?;

        let id_house = match data.target {
            OrderTarget::NewBuild { house, attributes } => {
                let input = CreateHouse {
                    status: HouseStatus::Project,
                    is_order: Some(true),
                    ..house
                };
                let house = HouseRepo::create(&mut tx, &input).await.map_err(|e| {
                    CoreError::OrderCreationFailed(format!("house insert failed: {e}"))
                })?;
                HouseAttributeLinkRepo::reconcile(&mut tx, house.id, &attributes)
                    .await
                    .map_err(|e| {
                        CoreError::OrderCreationFailed(format!("house links failed: {e}"))
                    })?;
                house.id
            }
            OrderTarget::Existing { id_house } => {
                HouseRepo::find_by_id(&mut tx, id_house)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "house",
                        id: id_house,
                    })?;
                id_house
            }
        };

        let order = OrderRepo::create(
            &mut tx,
            &CreateOrder {
                id_user: data.id_user,
                id_house,
                status: OrderStatus::Pending,
                contract_price: data.contract_price,
                create_date: today(),
            },
        )
        .await
        .map_err(|e| CoreError::OrderCreationFailed(format!("order insert failed: {e}")))?;

        tx.commit().await?;
        tracing::info!(order_id = order.id, house_id = id_house, "Created order");
        Ok(order)
    }

    /// Apply a partial update. The update date is stamped on every call; a
    /// requested status additionally applies its transition effects, all in
    /// one transaction. Date stamps already set are never cleared.
    pub async fn update_order(&self, id: DbId, data: UpdateOrderData) -> ServiceResult<Order> {
        let mut tx = self.pool.begin().await?;

        let existing = OrderRepo::find_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "order", id })?;

        let now = today();
        let effects = data
            .status
            .map(|status| transition_effects(status, now))
            .unwrap_or_default();

        let updated = OrderRepo::update(
            &mut tx,
            id,
            &UpdateOrder {
                status: data.status,
                contract_price: data.contract_price,
                update_date: Some(now),
                payment_date: effects.payment_date,
                sign_off_date: effects.sign_off_date,
                completion_date: effects.completion_date,
            },
        )
        .await?
        .ok_or(CoreError::NotFound { entity: "order", id })?;

        if let Some(status) = effects.house_status {
            HouseRepo::update(
                &mut tx,
                existing.id_house,
                &UpdateHouse {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?
            .ok_or(CoreError::NotFound {
                entity: "house",
                id: existing.id_house,
            })?;
        }

        tx.commit().await?;
        if let Some(status) = data.status {
            tracing::info!(order_id = id, status = ?status, "Order status updated");
        }
        Ok(updated)
    }

    /// Delete an order. The bound house is left standing.
    pub async fn delete_order(&self, id: DbId) -> ServiceResult<()> {
        let mut conn = self.pool.acquire().await?;
        OrderRepo::find_by_id(&mut conn, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "order", id })?;
        OrderRepo::delete(&mut conn, id).await?;
        tracing::info!(order_id = id, "Deleted order");
        Ok(())
    }

    /// Fetch a single order with its user and house resolved.
    pub async fn get_order(&self, id: DbId) -> ServiceResult<OrderWithRelations> {
        let mut conn = self.pool.acquire().await?;
        let order = OrderRepo::find_by_id(&mut conn, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "order", id })?;
        self.resolve_relations(&mut conn, order).await
    }

    /// List orders matching the filter, relations resolved.
    pub async fn list_orders(&self, filter: &OrderFilter) -> ServiceResult<Vec<OrderWithRelations>> {
        let mut conn = self.pool.acquire().await?;
        let orders = OrderRepo::list(&mut conn, filter).await?;
        let mut resolved = Vec::with_capacity(orders.len());
        for order in orders {
            resolved.push(self.resolve_relations(&mut conn, order).await?);
        }
        Ok(resolved)
    }

    async fn resolve_relations(
        &self,
        conn: &mut sqlx::PgConnection,
        order: Order,
    ) -> ServiceResult<OrderWithRelations> {
        let user = UserRepo::find_by_id(conn, order.id_user)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: order.id_user,
            })?;
        let house = HouseRepo::find_by_id(conn, order.id_house)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "house",
                id: order.id_house,
            })?;
        Ok(OrderWithRelations {
            order,
            user: user.into(),
            house,
        })
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
