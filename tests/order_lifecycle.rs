//! Order lifecycle integration tests
//!
//! Run against the in-memory engine: creation with stock reservation and
//! numbering, status transitions with their inventory effects, deletion,
//! and the back-office filters.

mod common;

use chrono::Utc;
use nursery_server::db::models::OrderStatus;
use nursery_server::db::repository::{OrderFilter, PlantRepository};
use nursery_server::orders::{CreateOrderRequest, LifecycleError, OrderItemRequest, OrderLifecycle};

use common::{key_of, mem_db, seed_category, seed_plant};

fn request(name: &str, items: Vec<OrderItemRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: name.to_string(),
        customer_phone: "5551234".to_string(),
        items,
        notes: None,
    }
}

fn item(plant_id: &str, quantity: i64) -> OrderItemRequest {
    OrderItemRequest {
        plant: plant_id.to_string(),
        quantity,
    }
}

#[tokio::test]
async fn create_order_reserves_stock_and_numbers_sequentially() {
    let db = mem_db().await;
    let category = seed_category(&db, "Succulents").await;
    let plant = seed_plant(&db, &category, "Aloe Vera", 10).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db.clone());

    let first = lifecycle
        .create_order(request("Rosa", vec![item(&plant_id, 3)]))
        .await
        .expect("First order should succeed");
    let second = lifecycle
        .create_order(request("Juan", vec![item(&plant_id, 2)]))
        .await
        .expect("Second order should succeed");

    let today = Utc::now().format("%Y%m%d").to_string();
    assert_eq!(first.order_number, format!("ORD-{}-001", today));
    assert_eq!(second.order_number, format!("ORD-{}-002", today));
    assert_eq!(first.status, OrderStatus::Pending);
    assert_eq!(first.items[0].plant_name, "Aloe Vera");
    assert_eq!(first.total_amount, 0.0);

    let plants = PlantRepository::new(db);
    let updated = plants.find_by_id(&plant_id).await.unwrap().unwrap();
    assert_eq!(updated.stock, 5);
    assert_eq!(updated.popularity, 5);
}

#[tokio::test]
async fn insufficient_stock_names_plant_and_counts() {
    let db = mem_db().await;
    let category = seed_category(&db, "Ferns").await;
    let plant = seed_plant(&db, &category, "Boston Fern", 2).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db.clone());

    let err = lifecycle
        .create_order(request("Rosa", vec![item(&plant_id, 5)]))
        .await
        .expect_err("Order should be rejected");

    assert_eq!(
        err.to_string(),
        "Not enough stock for Boston Fern. Available: 2, Requested: 5"
    );

    // The failed order must not touch stock
    let plants = PlantRepository::new(db);
    let unchanged = plants.find_by_id(&plant_id).await.unwrap().unwrap();
    assert_eq!(unchanged.stock, 2);
}

#[tokio::test]
async fn failed_later_item_keeps_earlier_reservations() {
    let db = mem_db().await;
    let category = seed_category(&db, "Herbs").await;
    let basil = seed_plant(&db, &category, "Basil", 10).await;
    let mint = seed_plant(&db, &category, "Mint", 1).await;
    let basil_id = key_of(&basil.id);
    let mint_id = key_of(&mint.id);

    let lifecycle = OrderLifecycle::new(db.clone());

    let result = lifecycle
        .create_order(request(
            "Rosa",
            vec![item(&basil_id, 4), item(&mint_id, 3)],
        ))
        .await;
    assert!(matches!(
        result,
        Err(LifecycleError::InsufficientStock { .. })
    ));

    // The basil reservation was already applied when mint failed
    let plants = PlantRepository::new(db);
    assert_eq!(
        plants.find_by_id(&basil_id).await.unwrap().unwrap().stock,
        6
    );
    assert_eq!(plants.find_by_id(&mint_id).await.unwrap().unwrap().stock, 1);
}

#[tokio::test]
async fn unknown_plant_is_rejected() {
    let db = mem_db().await;
    let lifecycle = OrderLifecycle::new(db);

    let err = lifecycle
        .create_order(request("Rosa", vec![item("nosuchplant", 1)]))
        .await
        .expect_err("Order should be rejected");
    assert!(matches!(err, LifecycleError::PlantNotFound(_)));
}

#[tokio::test]
async fn invalid_payloads_are_rejected_before_touching_stock() {
    let db = mem_db().await;
    let category = seed_category(&db, "Cacti").await;
    let plant = seed_plant(&db, &category, "Saguaro", 3).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db.clone());

    // No items
    let err = lifecycle
        .create_order(request("Rosa", vec![]))
        .await
        .expect_err("Empty order should be rejected");
    assert!(matches!(err, LifecycleError::Validation(_)));

    // Zero quantity
    let err = lifecycle
        .create_order(request("Rosa", vec![item(&plant_id, 0)]))
        .await
        .expect_err("Zero quantity should be rejected");
    assert!(matches!(err, LifecycleError::Validation(_)));

    // Missing customer name
    let err = lifecycle
        .create_order(request("", vec![item(&plant_id, 1)]))
        .await
        .expect_err("Missing name should be rejected");
    assert!(matches!(err, LifecycleError::Validation(_)));

    let plants = PlantRepository::new(db);
    assert_eq!(plants.find_by_id(&plant_id).await.unwrap().unwrap().stock, 3);
}

#[tokio::test]
async fn cancellation_restores_stock_exactly_once() {
    let db = mem_db().await;
    let category = seed_category(&db, "Palms").await;
    let plant = seed_plant(&db, &category, "Areca Palm", 8).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db.clone());
    let order = lifecycle
        .create_order(request("Rosa", vec![item(&plant_id, 3)]))
        .await
        .unwrap();
    let order_id = key_of(&order.id);

    let plants = PlantRepository::new(db.clone());
    assert_eq!(plants.find_by_id(&plant_id).await.unwrap().unwrap().stock, 5);

    let cancelled = lifecycle.set_status(&order_id, "cancelled").await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(plants.find_by_id(&plant_id).await.unwrap().unwrap().stock, 8);

    // A cancelled order is frozen; a second cancel must not restore again
    let err = lifecycle
        .set_status(&order_id, "cancelled")
        .await
        .expect_err("Cancelled order should be frozen");
    assert!(matches!(
        err,
        LifecycleError::FrozenOrder(OrderStatus::Cancelled)
    ));
    assert_eq!(plants.find_by_id(&plant_id).await.unwrap().unwrap().stock, 8);
}

#[tokio::test]
async fn completed_orders_are_frozen() {
    let db = mem_db().await;
    let category = seed_category(&db, "Vines").await;
    let plant = seed_plant(&db, &category, "Pothos", 4).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db.clone());
    let order = lifecycle
        .create_order(request("Rosa", vec![item(&plant_id, 1)]))
        .await
        .unwrap();
    let order_id = key_of(&order.id);

    lifecycle.set_status(&order_id, "completed").await.unwrap();

    let err = lifecycle
        .set_status(&order_id, "cancelled")
        .await
        .expect_err("Completed order should be frozen");
    assert!(matches!(
        err,
        LifecycleError::FrozenOrder(OrderStatus::Completed)
    ));

    // Completion never returns stock
    let plants = PlantRepository::new(db);
    assert_eq!(plants.find_by_id(&plant_id).await.unwrap().unwrap().stock, 3);
}

#[tokio::test]
async fn live_orders_move_freely_and_cancel_restores_from_any_state() {
    let db = mem_db().await;
    let category = seed_category(&db, "Trees").await;
    let plant = seed_plant(&db, &category, "Ficus", 6).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db.clone());
    let order = lifecycle
        .create_order(request("Rosa", vec![item(&plant_id, 2)]))
        .await
        .unwrap();
    let order_id = key_of(&order.id);

    // Skipping approved is allowed
    let shipped = lifecycle.set_status(&order_id, "shipped").await.unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    // Cancelling a shipped order still restores its reservation
    lifecycle.set_status(&order_id, "cancelled").await.unwrap();
    let plants = PlantRepository::new(db);
    assert_eq!(plants.find_by_id(&plant_id).await.unwrap().unwrap().stock, 6);
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let db = mem_db().await;
    let category = seed_category(&db, "Moss").await;
    let plant = seed_plant(&db, &category, "Sheet Moss", 2).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db);
    let order = lifecycle
        .create_order(request("Rosa", vec![item(&plant_id, 1)]))
        .await
        .unwrap();
    let order_id = key_of(&order.id);

    let err = lifecycle
        .set_status(&order_id, "refunded")
        .await
        .expect_err("Unknown status should be rejected");
    assert!(matches!(err, LifecycleError::InvalidStatus(_)));
}

#[tokio::test]
async fn deleting_an_order_restores_stock_unless_already_cancelled() {
    let db = mem_db().await;
    let category = seed_category(&db, "Grasses").await;
    let plant = seed_plant(&db, &category, "Fountain Grass", 10).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db.clone());
    let plants = PlantRepository::new(db.clone());

    // Deleting a pending order returns its reservation
    let order = lifecycle
        .create_order(request("Rosa", vec![item(&plant_id, 4)]))
        .await
        .unwrap();
    let order_id = key_of(&order.id);
    assert_eq!(plants.find_by_id(&plant_id).await.unwrap().unwrap().stock, 6);

    lifecycle.delete_order(&order_id).await.unwrap();
    assert_eq!(
        plants.find_by_id(&plant_id).await.unwrap().unwrap().stock,
        10
    );
    let err = lifecycle.get_order(&order_id).await.expect_err("Gone");
    assert!(matches!(err, LifecycleError::OrderNotFound(_)));

    // A cancelled order already restored its stock; deletion must not repeat it
    let order = lifecycle
        .create_order(request("Juan", vec![item(&plant_id, 4)]))
        .await
        .unwrap();
    let order_id = key_of(&order.id);
    lifecycle.set_status(&order_id, "cancelled").await.unwrap();
    assert_eq!(
        plants.find_by_id(&plant_id).await.unwrap().unwrap().stock,
        10
    );

    lifecycle.delete_order(&order_id).await.unwrap();
    assert_eq!(
        plants.find_by_id(&plant_id).await.unwrap().unwrap().stock,
        10
    );
}

#[tokio::test]
async fn filters_narrow_the_listing_newest_first() {
    let db = mem_db().await;
    let category = seed_category(&db, "Flowers").await;
    let plant = seed_plant(&db, &category, "Marigold", 100).await;
    let plant_id = key_of(&plant.id);

    let lifecycle = OrderLifecycle::new(db.clone());

    let rosa = lifecycle
        .create_order(request("Rosa Martinez", vec![item(&plant_id, 1)]))
        .await
        .unwrap();
    let juan = lifecycle
        .create_order(request("Juan Perez", vec![item(&plant_id, 1)]))
        .await
        .unwrap();
    lifecycle
        .set_status(&key_of(&juan.id), "approved")
        .await
        .unwrap();

    // No filter: both, newest first
    let all = lifecycle.list_orders(OrderFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].order_number, juan.order_number);
    assert_eq!(all[1].order_number, rosa.order_number);

    // Status filter
    let approved = lifecycle
        .list_orders(OrderFilter {
            status: Some(OrderStatus::Approved),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].customer_name, "Juan Perez");

    // Case-insensitive substring on the customer name
    let by_name = lifecycle
        .list_orders(OrderFilter {
            customer_name: Some("MARTI".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].customer_name, "Rosa Martinez");

    // Date range covering today matches everything; tomorrow-only matches nothing
    let today = Utc::now().date_naive();
    let start = today.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end = today.and_hms_opt(23, 59, 59).unwrap().and_utc();
    let in_range = lifecycle
        .list_orders(OrderFilter {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(in_range.len(), 2);

    let tomorrow = rosa.ordered_at + chrono::Duration::days(1);
    let future = lifecycle
        .list_orders(OrderFilter {
            start_date: Some(tomorrow),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(future.is_empty());
}
