//! Integration tests for the order lifecycle: new-build creation, status
//! transitions with their date stamps, and the house side effect.

use assert_matches::assert_matches;
use kvartal_core::error::CoreError;
use kvartal_db::models::attribute::CreateAttribute;
use kvartal_db::models::house::CreateHouse;
use kvartal_db::models::link::LinkValue;
use kvartal_db::models::status::{HouseStatus, OrderStatus, Role};
use kvartal_db::models::user::CreateUser;
use kvartal_db::repositories::{AttributeRepo, HouseRepo, UserRepo};
use kvartal_service::error::ServiceError;
use kvartal_service::orders::{CreateOrderData, OrderService, OrderTarget, UpdateOrderData};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool) -> i64 {
    let mut conn = pool.acquire().await.unwrap();
    UserRepo::create(
        &mut conn,
        &CreateUser {
            name: "Buyer".to_string(),
            org_name: None,
            role: Role::User,
            email: "buyer@example.com".to_string(),
            password_hash: "$argon2id$fake-hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_build_house() -> CreateHouse {
    CreateHouse {
        name: "Commissioned Cottage".to_string(),
        description: None,
        image: None,
        // Deliberately not Project: create_order must force it.
        status: HouseStatus::ForSale,
        is_order: None,
        district: "North".to_string(),
        address: "Forest rd. 7".to_string(),
        floors: 2,
        entrances: None,
        start_price: None,
        final_price: None,
    }
}

fn price() -> Decimal {
    Decimal::new(3_200_000, 0)
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn new_build_order_forces_project_house(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let mut conn = pool.acquire().await.unwrap();
    let district = AttributeRepo::create(
        &mut conn,
        &CreateAttribute {
            name: "district class".to_string(),
        },
    )
    .await
    .unwrap();

    let order = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::NewBuild {
                house: new_build_house(),
                attributes: vec![LinkValue {
                    id: district.id,
                    value: "Central".to_string(),
                }],
            },
        })
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.contract_price, price());
    assert_eq!(order.create_date, chrono::Utc::now().date_naive());
    assert!(order.update_date.is_none());

    let house = HouseRepo::find_by_id(&mut conn, order.id_house)
        .await
        .unwrap()
        .expect("house created with the order");
    assert_eq!(house.status, HouseStatus::Project);
    assert!(house.is_order);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn order_for_existing_house_keeps_its_status(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let mut conn = pool.acquire().await.unwrap();
    let house = HouseRepo::create(
        &mut conn,
        &CreateHouse {
            status: HouseStatus::ForSale,
            ..new_build_house()
        },
    )
    .await
    .unwrap();

    let order = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::Existing { id_house: house.id },
        })
        .await
        .unwrap();

    assert_eq!(order.id_house, house.id);
    let house = HouseRepo::find_by_id(&mut conn, house.id).await.unwrap().unwrap();
    assert_eq!(house.status, HouseStatus::ForSale);
    assert!(!house.is_order);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn order_for_missing_house_is_not_found(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let result = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::Existing { id_house: 99_999 },
        })
        .await;
    assert_matches!(
        result,
        Err(ServiceError::Core(CoreError::NotFound { entity: "house", .. }))
    );
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn paid_stamps_payment_date_and_later_updates_keep_it(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let order = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::NewBuild {
                house: new_build_house(),
                attributes: vec![],
            },
        })
        .await
        .unwrap();

    let paid = orders
        .update_order(
            order.id,
            UpdateOrderData {
                status: Some(OrderStatus::Paid),
                contract_price: None,
            },
        )
        .await
        .unwrap();
    let today = chrono::Utc::now().date_naive();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert_eq!(paid.payment_date, Some(today));
    assert_eq!(paid.update_date, Some(today));

    // A later transition to a different status never clears the stamp.
    let later = orders
        .update_order(
            order.id,
            UpdateOrderData {
                status: Some(OrderStatus::AwaitingSignOff),
                contract_price: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(later.status, OrderStatus::AwaitingSignOff);
    assert_eq!(later.payment_date, Some(today));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signed_stamps_sign_off_date(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let order = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::NewBuild {
                house: new_build_house(),
                attributes: vec![],
            },
        })
        .await
        .unwrap();

    let signed = orders
        .update_order(
            order.id,
            UpdateOrderData {
                status: Some(OrderStatus::Signed),
                contract_price: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(signed.sign_off_date, Some(chrono::Utc::now().date_naive()));
    assert!(signed.payment_date.is_none());
    assert!(signed.completion_date.is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completed_stamps_date_and_builds_house(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let order = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::NewBuild {
                house: new_build_house(),
                attributes: vec![],
            },
        })
        .await
        .unwrap();

    let completed = orders
        .update_order(
            order.id,
            UpdateOrderData {
                status: Some(OrderStatus::Completed),
                contract_price: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(completed.completion_date, Some(chrono::Utc::now().date_naive()));

    let mut conn = pool.acquire().await.unwrap();
    let house = HouseRepo::find_by_id(&mut conn, order.id_house)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(house.status, HouseStatus::Built);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn scalar_update_without_status_stamps_only_update_date(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let order = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::NewBuild {
                house: new_build_house(),
                attributes: vec![],
            },
        })
        .await
        .unwrap();

    let new_price = Decimal::new(3_500_000, 0);
    let updated = orders
        .update_order(
            order.id,
            UpdateOrderData {
                status: None,
                contract_price: Some(new_price),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.contract_price, new_price);
    assert_eq!(updated.status, OrderStatus::Pending);
    assert_eq!(updated.update_date, Some(chrono::Utc::now().date_naive()));
    assert!(updated.payment_date.is_none());
}

// ---------------------------------------------------------------------------
// Deletion and resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_order_leaves_the_house_standing(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let order = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::NewBuild {
                house: new_build_house(),
                attributes: vec![],
            },
        })
        .await
        .unwrap();

    orders.delete_order(order.id).await.unwrap();

    assert_matches!(
        orders.get_order(order.id).await,
        Err(ServiceError::Core(CoreError::NotFound { entity: "order", .. }))
    );

    let mut conn = pool.acquire().await.unwrap();
    assert!(HouseRepo::find_by_id(&mut conn, order.id_house)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_order_resolves_user_and_house(pool: PgPool) {
    let user = seed_user(&pool).await;
    let orders = OrderService::new(pool.clone());

    let order = orders
        .create_order(CreateOrderData {
            id_user: user,
            contract_price: price(),
            target: OrderTarget::NewBuild {
                house: new_build_house(),
                attributes: vec![],
            },
        })
        .await
        .unwrap();

    let resolved = orders.get_order(order.id).await.unwrap();
    assert_eq!(resolved.user.id, user);
    assert_eq!(resolved.user.email, "buyer@example.com");
    assert_eq!(resolved.house.id, order.id_house);
    assert_eq!(resolved.house.name, "Commissioned Cottage");
}
