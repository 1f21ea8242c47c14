//! Integration tests for repository CRUD against a real database:
//! defaults on insert, partial updates, filtered listing, and the
//! link-narrowed house/apartment queries.

use kvartal_db::models::apartment::{
    ApartmentFilter, CreateApartment, ParameterValueFilter, UpdateApartment,
};
use kvartal_db::models::attribute::CreateAttribute;
use kvartal_db::models::category::CreateCategory;
use kvartal_db::models::house::{AttributeValueFilter, CreateHouse, HouseFilter, UpdateHouse};
use kvartal_db::models::order::{CreateOrder, OrderFilter, UpdateOrder};
use kvartal_db::models::parameter::CreateParameter;
use kvartal_db::models::status::{HouseStatus, OrderStatus, Role};
use kvartal_db::models::user::CreateUser;
use kvartal_db::repositories::{
    ApartmentParameterLinkRepo, ApartmentRepo, AttributeRepo, CategoryRepo,
    HouseAttributeLinkRepo, HouseRepo, OrderRepo, ParameterRepo, UserRepo,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_house(name: &str, district: &str) -> CreateHouse {
    CreateHouse {
        name: name.to_string(),
        description: None,
        image: None,
        status: HouseStatus::Project,
        is_order: None,
        district: district.to_string(),
        address: format!("{district} st. 1"),
        floors: 5,
        entrances: None,
        start_price: None,
        final_price: None,
    }
}

fn new_apartment(id_house: i64, id_category: i64, name: &str) -> CreateApartment {
    CreateApartment {
        id_house,
        id_category,
        name: name.to_string(),
        description: None,
        rooms: 2,
        area: Decimal::new(725, 1), // 72.5
        unit_count: None,
    }
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        name: "Test User".to_string(),
        org_name: None,
        role: Role::User,
        email: email.to_string(),
        password_hash: "$argon2id$fake-hash".to_string(),
    }
}

fn new_order(id_user: i64, id_house: i64) -> CreateOrder {
    CreateOrder {
        id_user,
        id_house,
        status: OrderStatus::Pending,
        contract_price: Decimal::new(1_500_000, 0),
        create_date: chrono::Utc::now().date_naive(),
    }
}

// ---------------------------------------------------------------------------
// Houses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn house_create_applies_defaults(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let house = HouseRepo::create(&mut conn, &new_house("Riverside", "Central"))
        .await
        .unwrap();
    assert_eq!(house.name, "Riverside");
    assert_eq!(house.status, HouseStatus::Project);
    assert!(!house.is_order);
    assert_eq!(house.entrances, 1);
    assert!(house.image.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn house_partial_update_touches_only_given_fields(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let house = HouseRepo::create(&mut conn, &new_house("Riverside", "Central"))
        .await
        .unwrap();

    let updated = HouseRepo::update(
        &mut conn,
        house.id,
        &UpdateHouse {
            status: Some(HouseStatus::InProgress),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("house exists");

    assert_eq!(updated.status, HouseStatus::InProgress);
    // Untouched fields survive.
    assert_eq!(updated.name, "Riverside");
    assert_eq!(updated.district, "Central");
    assert_eq!(updated.floors, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn house_update_nonexistent_returns_none(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let result = HouseRepo::update(
        &mut conn,
        99_999,
        &UpdateHouse {
            name: Some("Ghost".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn house_delete_nonexistent_returns_false(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    assert!(!HouseRepo::delete(&mut conn, 99_999).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn house_list_filters_are_conjunctive(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    HouseRepo::create(&mut conn, &new_house("A", "Central")).await.unwrap();
    HouseRepo::create(&mut conn, &new_house("B", "Central")).await.unwrap();
    HouseRepo::create(&mut conn, &new_house("C", "North")).await.unwrap();

    // Empty filter returns all rows.
    let all = HouseRepo::list(&mut conn, &HouseFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let central = HouseRepo::list(
        &mut conn,
        &HouseFilter {
            district: Some("Central".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(central.len(), 2);

    let named = HouseRepo::list(
        &mut conn,
        &HouseFilter {
            district: Some("Central".to_string()),
            name: Some("B".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].name, "B");

    // No match is an empty sequence, not an error.
    let none = HouseRepo::list(
        &mut conn,
        &HouseFilter {
            district: Some("Nowhere".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn house_list_narrows_by_attribute_value(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let district_class = AttributeRepo::create(
        &mut conn,
        &CreateAttribute {
            name: "district class".to_string(),
        },
    )
    .await
    .unwrap();

    let a = HouseRepo::create(&mut conn, &new_house("A", "Central")).await.unwrap();
    let b = HouseRepo::create(&mut conn, &new_house("B", "Central")).await.unwrap();
    HouseAttributeLinkRepo::insert(&mut conn, a.id, district_class.id, "premium")
        .await
        .unwrap();
    HouseAttributeLinkRepo::insert(&mut conn, b.id, district_class.id, "standard")
        .await
        .unwrap();

    let premium = HouseRepo::list(
        &mut conn,
        &HouseFilter {
            attribute: Some(AttributeValueFilter {
                id_attribute: district_class.id,
                value: "premium".to_string(),
            }),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(premium.len(), 1);
    assert_eq!(premium[0].id, a.id);

    // Value must match exactly; a different value matches nothing.
    let luxury = HouseRepo::list(
        &mut conn,
        &HouseFilter {
            attribute: Some(AttributeValueFilter {
                id_attribute: district_class.id,
                value: "luxury".to_string(),
            }),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(luxury.is_empty());
}

// ---------------------------------------------------------------------------
// Apartments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn apartment_crud_and_house_scoping(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let house_a = HouseRepo::create(&mut conn, &new_house("A", "Central")).await.unwrap();
    let house_b = HouseRepo::create(&mut conn, &new_house("B", "North")).await.unwrap();
    let category = CategoryRepo::create(
        &mut conn,
        &CreateCategory {
            name: "Standard".to_string(),
        },
    )
    .await
    .unwrap();

    let one = ApartmentRepo::create(&mut conn, &new_apartment(house_a.id, category.id, "1A"))
        .await
        .unwrap();
    ApartmentRepo::create(&mut conn, &new_apartment(house_a.id, category.id, "2A"))
        .await
        .unwrap();
    ApartmentRepo::create(&mut conn, &new_apartment(house_b.id, category.id, "1B"))
        .await
        .unwrap();

    assert_eq!(one.unit_count, 1); // default

    let in_a = ApartmentRepo::list_by_house(&mut conn, house_a.id).await.unwrap();
    assert_eq!(in_a.len(), 2);

    let filtered = ApartmentRepo::list(
        &mut conn,
        &ApartmentFilter {
            id_house: Some(house_b.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "1B");

    let updated = ApartmentRepo::update(
        &mut conn,
        one.id,
        &UpdateApartment {
            rooms: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("apartment exists");
    assert_eq!(updated.rooms, 3);
    assert_eq!(updated.name, "1A");

    assert!(ApartmentRepo::delete(&mut conn, one.id).await.unwrap());
    assert!(ApartmentRepo::find_by_id(&mut conn, one.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn apartment_list_narrows_by_parameter_value(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let house = HouseRepo::create(&mut conn, &new_house("H", "Central")).await.unwrap();
    let category = CategoryRepo::create(
        &mut conn,
        &CreateCategory {
            name: "Standard".to_string(),
        },
    )
    .await
    .unwrap();
    let ceiling = ParameterRepo::create(
        &mut conn,
        &CreateParameter {
            name: "ceiling height".to_string(),
        },
    )
    .await
    .unwrap();

    let tall = ApartmentRepo::create(&mut conn, &new_apartment(house.id, category.id, "1A"))
        .await
        .unwrap();
    let low = ApartmentRepo::create(&mut conn, &new_apartment(house.id, category.id, "2A"))
        .await
        .unwrap();
    ApartmentParameterLinkRepo::insert(&mut conn, tall.id, ceiling.id, "3.2")
        .await
        .unwrap();
    ApartmentParameterLinkRepo::insert(&mut conn, low.id, ceiling.id, "2.5")
        .await
        .unwrap();

    let matched = ApartmentRepo::list(
        &mut conn,
        &ApartmentFilter {
            parameter: Some(ParameterValueFilter {
                id_parameter: ceiling.id,
                value: "3.2".to_string(),
            }),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, tall.id);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_user_email_rejected_by_constraint(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    UserRepo::create(&mut conn, &new_user("ivan@example.com"))
        .await
        .unwrap();
    let result = UserRepo::create(&mut conn, &new_user("ivan@example.com")).await;
    assert!(result.is_err(), "unique email constraint must fire");
}

#[sqlx::test(migrations = "./migrations")]
async fn user_lookup_by_email(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let created = UserRepo::create(&mut conn, &new_user("olga@example.com"))
        .await
        .unwrap();
    let found = UserRepo::find_by_email(&mut conn, "olga@example.com")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(found.id, created.id);
    assert!(UserRepo::find_by_email(&mut conn, "nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn order_update_never_clears_date_stamps(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let user = UserRepo::create(&mut conn, &new_user("buyer@example.com"))
        .await
        .unwrap();
    let house = HouseRepo::create(&mut conn, &new_house("Order Target", "Central"))
        .await
        .unwrap();
    let order = OrderRepo::create(&mut conn, &new_order(user.id, house.id))
        .await
        .unwrap();
    assert!(order.payment_date.is_none());

    let paid_on = chrono::Utc::now().date_naive();
    let updated = OrderRepo::update(
        &mut conn,
        order.id,
        &UpdateOrder {
            status: Some(OrderStatus::Paid),
            payment_date: Some(paid_on),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("order exists");
    assert_eq!(updated.payment_date, Some(paid_on));

    // A later update with no stamp in the payload keeps the stamp.
    let later = OrderRepo::update(
        &mut conn,
        order.id,
        &UpdateOrder {
            status: Some(OrderStatus::AwaitingSignOff),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("order exists");
    assert_eq!(later.status, OrderStatus::AwaitingSignOff);
    assert_eq!(later.payment_date, Some(paid_on));
}

#[sqlx::test(migrations = "./migrations")]
async fn order_list_filters_by_user_and_status(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();

    let buyer = UserRepo::create(&mut conn, &new_user("a@example.com")).await.unwrap();
    let other = UserRepo::create(&mut conn, &new_user("b@example.com")).await.unwrap();
    let house = HouseRepo::create(&mut conn, &new_house("H", "Central")).await.unwrap();

    OrderRepo::create(&mut conn, &new_order(buyer.id, house.id)).await.unwrap();
    OrderRepo::create(&mut conn, &new_order(other.id, house.id)).await.unwrap();

    let by_user = OrderRepo::list(
        &mut conn,
        &OrderFilter {
            id_user: Some(buyer.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].id_user, buyer.id);

    let pending = OrderRepo::list(
        &mut conn,
        &OrderFilter {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.len(), 2);
}
