//! Integration tests for the return/exchange engine: eligibility lookup,
//! atomic return commit, restocking, exchange orders, and status resolution.

mod common;

use assert_matches::assert_matches;
use aurelion_pos::{
    entities::{
        order, order_item, product_variant,
        return_entity::{self, ReturnAction, ReturnReason},
        return_item,
        staff::StaffRole,
        OrderStatus, OrderType,
    },
    errors::ServiceError,
    services::{
        checkout::{CartLineInput, CheckoutRequest, Receipt},
        returns::{
            ItemReturnability, ReplacementLineInput, ReturnCheckoutRequest, ReturnLineInput,
        },
    },
};
use chrono::{Duration, Utc};
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

struct Sale {
    receipt: Receipt,
    staff_id: Uuid,
    location_id: Uuid,
}

async fn sell(app: &TestApp, lines: Vec<(&str, i32, Decimal)>) -> Sale {
    let staff = app.seed_staff(StaffRole::Cashier).await;
    let location = app.seed_location().await;

    let items = lines
        .into_iter()
        .map(|(sku, qty, price)| CartLineInput {
            sku: sku.to_string(),
            qty,
            unit_price: price,
        })
        .collect();

    let receipt = app
        .state
        .checkout_service
        .checkout(CheckoutRequest {
            items,
            client_id: None,
            promo_code: None,
            manual_discount: None,
            staff_id: staff.id,
            location_id: location.id,
        })
        .await
        .expect("seed sale should succeed");

    Sale {
        receipt,
        staff_id: staff.id,
        location_id: location.id,
    }
}

async fn order_items_of(app: &TestApp, order_id: Uuid) -> Vec<order_item::Model> {
    order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(app.db())
        .await
        .unwrap()
}

async fn on_hand(app: &TestApp, variant_id: Uuid) -> i32 {
    product_variant::Entity::find_by_id(variant_id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap()
        .on_hand
}

async fn order_status(app: &TestApp, order_id: Uuid) -> OrderStatus {
    order::Entity::find_by_id(order_id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap()
        .status
}

fn return_request(
    order_ref: &str,
    staff_id: Uuid,
    return_items: Vec<ReturnLineInput>,
    replacement_items: Vec<ReplacementLineInput>,
) -> ReturnCheckoutRequest {
    ReturnCheckoutRequest {
        order_ref: order_ref.to_string(),
        reason: ReturnReason::ChangedMind,
        action: if replacement_items.is_empty() {
            ReturnAction::Refund
        } else {
            ReturnAction::Exchange
        },
        return_items,
        replacement_items,
        staff_id,
    }
}

#[tokio::test]
async fn full_return_restocks_and_marks_order_fully_returned() {
    let app = TestApp::new().await;
    let variant = app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let sale = sell(&app, vec![("BAG-001", 3, dec!(100.00))]).await;
    assert_eq!(on_hand(&app, variant.id).await, 2);

    let items = order_items_of(&app, sale.receipt.order_id).await;
    let outcome = app
        .state
        .return_service
        .process(return_request(
            &sale.receipt.order_code,
            sale.staff_id,
            vec![ReturnLineInput {
                order_item_id: items[0].id,
                qty: 3,
            }],
            vec![],
        ))
        .await
        .expect("return should succeed");

    assert_eq!(outcome.refund_amount, dec!(300.00));
    assert_eq!(outcome.original_order_status, OrderStatus::FullyReturned);
    assert_eq!(outcome.exchange_order_code, None);
    assert_eq!(outcome.net_due, dec!(-300.00));
    assert_eq!(outcome.returned_items.len(), 1);
    assert_eq!(outcome.returned_items[0].qty, 3);

    let item = order_item::Entity::find_by_id(items[0].id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.qty_returned, 3);
    assert_eq!(item.qty_remaining(), 0);
    assert!(item.is_fully_returned());

    assert_eq!(on_hand(&app, variant.id).await, 5);
    assert_eq!(
        order_status(&app, sale.receipt.order_id).await,
        OrderStatus::FullyReturned
    );
}

#[tokio::test]
async fn partial_return_marks_order_partially_returned() {
    let app = TestApp::new().await;
    let variant = app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let sale = sell(&app, vec![("BAG-001", 3, dec!(100.00))]).await;

    let items = order_items_of(&app, sale.receipt.order_id).await;
    let outcome = app
        .state
        .return_service
        .process(return_request(
            &sale.receipt.order_code,
            sale.staff_id,
            vec![ReturnLineInput {
                order_item_id: items[0].id,
                qty: 1,
            }],
            vec![],
        ))
        .await
        .expect("partial return should succeed");

    assert_eq!(outcome.refund_amount, dec!(100.00));
    assert_eq!(
        outcome.original_order_status,
        OrderStatus::PartiallyReturned
    );
    assert_eq!(on_hand(&app, variant.id).await, 3);
}

#[tokio::test]
async fn over_return_is_rejected_with_no_side_effects() {
    let app = TestApp::new().await;
    let variant = app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let sale = sell(&app, vec![("BAG-001", 2, dec!(100.00))]).await;
    let items = order_items_of(&app, sale.receipt.order_id).await;

    // Return one unit so only one remains returnable.
    app.state
        .return_service
        .process(return_request(
            &sale.receipt.order_code,
            sale.staff_id,
            vec![ReturnLineInput {
                order_item_id: items[0].id,
                qty: 1,
            }],
            vec![],
        ))
        .await
        .expect("first return should succeed");

    let stock_before = on_hand(&app, variant.id).await;
    let returns_before = return_entity::Entity::find().count(app.db()).await.unwrap();

    let err = app
        .state
        .return_service
        .process(return_request(
            &sale.receipt.order_code,
            sale.staff_id,
            vec![ReturnLineInput {
                order_item_id: items[0].id,
                qty: 2,
            }],
            vec![],
        ))
        .await
        .expect_err("returning more than remaining must fail");

    assert_matches!(err, ServiceError::ReturnNotAllowed(_));
    assert!(err.to_string().contains("Only 1 remaining"));

    // Nothing moved: same stock, same return count, same qty_returned.
    assert_eq!(on_hand(&app, variant.id).await, stock_before);
    assert_eq!(
        return_entity::Entity::find().count(app.db()).await.unwrap(),
        returns_before
    );
    let item = order_item::Entity::find_by_id(items[0].id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.qty_returned, 1);
    assert_eq!(
        order_status(&app, sale.receipt.order_id).await,
        OrderStatus::PartiallyReturned
    );
}

#[tokio::test]
async fn exchange_creates_linked_order_and_computes_net_due() {
    let app = TestApp::new().await;
    let returned_variant = app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let replacement_variant = app.seed_sku("BAG-002", dec!(150.00), 4).await;
    let sale = sell(&app, vec![("BAG-001", 2, dec!(100.00))]).await;
    let items = order_items_of(&app, sale.receipt.order_id).await;

    let outcome = app
        .state
        .return_service
        .process(return_request(
            &sale.receipt.order_code,
            sale.staff_id,
            vec![ReturnLineInput {
                order_item_id: items[0].id,
                qty: 2,
            }],
            vec![ReplacementLineInput {
                sku: "BAG-002".into(),
                qty: 1,
                unit_price: dec!(150.00),
            }],
        ))
        .await
        .expect("exchange should succeed");

    assert_eq!(outcome.refund_amount, dec!(200.00));
    assert_eq!(outcome.exchange_total, dec!(150.00));
    // Customer returned 200 worth and took 150: we owe them 50.
    assert_eq!(outcome.net_due, dec!(-50.00));

    let exchange_code = outcome
        .exchange_order_code
        .expect("an exchange order code");
    let exchange = order::Entity::find()
        .filter(order::Column::OrderCode.eq(exchange_code.as_str()))
        .one(app.db())
        .await
        .unwrap()
        .expect("exchange order persisted");
    assert_eq!(exchange.order_type, OrderType::Exchange);
    assert_eq!(exchange.status, OrderStatus::Completed);
    assert_eq!(exchange.parent_order_id, Some(sale.receipt.order_id));
    assert_eq!(exchange.total_amount, dec!(150.00));
    assert_eq!(exchange.location_id, sale.location_id);

    let exchange_items = order_items_of(&app, exchange.id).await;
    assert_eq!(exchange_items.len(), 1);
    assert_eq!(exchange_items[0].quantity, 1);

    // The return row links to the exchange order.
    let return_row = return_entity::Entity::find()
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(return_row.replacement_order_id, Some(exchange.id));
    assert_eq!(return_row.original_order_id, sale.receipt.order_id);
    assert_eq!(return_row.action, ReturnAction::Exchange);

    // Stock: returned units back, replacement unit gone.
    assert_eq!(on_hand(&app, returned_variant.id).await, 5);
    assert_eq!(on_hand(&app, replacement_variant.id).await, 3);
}

#[tokio::test]
async fn exchange_with_insufficient_replacement_stock_aborts_everything() {
    let app = TestApp::new().await;
    let returned_variant = app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let replacement_variant = app.seed_sku("BAG-002", dec!(150.00), 0).await;
    let sale = sell(&app, vec![("BAG-001", 2, dec!(100.00))]).await;
    let items = order_items_of(&app, sale.receipt.order_id).await;

    let err = app
        .state
        .return_service
        .process(return_request(
            &sale.receipt.order_code,
            sale.staff_id,
            vec![ReturnLineInput {
                order_item_id: items[0].id,
                qty: 2,
            }],
            vec![ReplacementLineInput {
                sku: "BAG-002".into(),
                qty: 1,
                unit_price: dec!(150.00),
            }],
        ))
        .await
        .expect_err("exchange must fail on replacement stock");

    assert_matches!(
        err,
        ServiceError::InsufficientStock {
            available: 0,
            requested: 1,
            ..
        }
    );

    // No restock of the returned item, no return rows, status untouched.
    assert_eq!(on_hand(&app, returned_variant.id).await, 3);
    assert_eq!(on_hand(&app, replacement_variant.id).await, 0);
    assert_eq!(
        return_entity::Entity::find().count(app.db()).await.unwrap(),
        0
    );
    assert_eq!(
        return_item::Entity::find().count(app.db()).await.unwrap(),
        0
    );
    assert_eq!(
        order_status(&app, sale.receipt.order_id).await,
        OrderStatus::Completed
    );
}

#[tokio::test]
async fn lookup_classifies_items_and_normalizes_the_code() {
    let app = TestApp::new().await;
    app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let sale = sell(&app, vec![("BAG-001", 2, dec!(100.00))]).await;

    // Registers hand us codes with a # prefix and stray case.
    let noisy_ref = format!("#{}", sale.receipt.order_code.to_lowercase());
    let eligibility = app
        .state
        .return_service
        .lookup(&noisy_ref)
        .await
        .expect("lookup should succeed");

    assert_eq!(eligibility.order_code, sale.receipt.order_code);
    assert_eq!(eligibility.return_window_days, 10);
    assert_eq!(eligibility.items.len(), 1);
    assert_eq!(eligibility.items[0].status, ItemReturnability::Returnable);
    assert_eq!(eligibility.items[0].qty_remaining, 2);
    assert_eq!(eligibility.items[0].returned_qty, 0);
}

#[tokio::test]
async fn lookup_rejects_fully_returned_orders() {
    let app = TestApp::new().await;
    app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let sale = sell(&app, vec![("BAG-001", 1, dec!(100.00))]).await;
    let items = order_items_of(&app, sale.receipt.order_id).await;

    app.state
        .return_service
        .process(return_request(
            &sale.receipt.order_code,
            sale.staff_id,
            vec![ReturnLineInput {
                order_item_id: items[0].id,
                qty: 1,
            }],
            vec![],
        ))
        .await
        .expect("return should succeed");

    let err = app
        .state
        .return_service
        .lookup(&sale.receipt.order_code)
        .await
        .expect_err("fully returned order is not eligible");
    assert_matches!(err, ServiceError::ReturnNotAllowed(reason)
        if reason.contains("already been fully returned"));
}

#[tokio::test]
async fn lookup_rejects_return_type_orders() {
    let app = TestApp::new().await;
    let staff = app.seed_staff(StaffRole::Cashier).await;
    let location = app.seed_location().await;

    // A RETURN-type order as the legacy refund documents create them.
    let refund_order = order::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_code: Set("RFND01".into()),
        order_type: Set(OrderType::Return),
        status: Set(OrderStatus::Refunded),
        client_id: Set(None),
        location_id: Set(location.id),
        created_by: Set(staff.id),
        total_amount: Set(dec!(-100.00)),
        total_discount: Set(Decimal::ZERO),
        parent_order_id: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(app.db())
    .await
    .unwrap();

    let err = app
        .state
        .return_service
        .lookup(&refund_order.order_code)
        .await
        .expect_err("return orders cannot be returned");
    assert_matches!(err, ServiceError::ReturnNotAllowed(reason)
        if reason.contains("cannot be returned again"));
}

#[tokio::test]
async fn lookup_rejects_orders_outside_the_return_window() {
    let app = TestApp::new().await;
    app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let sale = sell(&app, vec![("BAG-001", 1, dec!(100.00))]).await;

    // Backdate the sale past the 10-day window.
    let stale = order::Entity::find_by_id(sale.receipt.order_id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    let mut stale: order::ActiveModel = stale.into();
    stale.created_at = Set(Utc::now() - Duration::days(11));
    stale.update(app.db()).await.unwrap();

    let err = app
        .state
        .return_service
        .lookup(&sale.receipt.order_code)
        .await
        .expect_err("window expired");
    assert_matches!(err, ServiceError::ReturnNotAllowed(reason)
        if reason.contains("Return window has expired"));
}

#[tokio::test]
async fn foreign_order_item_fails_validation_and_rolls_back() {
    let app = TestApp::new().await;
    app.seed_sku("BAG-001", dec!(100.00), 5).await;
    app.seed_sku("BAG-002", dec!(100.00), 5).await;
    let sale_a = sell(&app, vec![("BAG-001", 1, dec!(100.00))]).await;
    let sale_b = sell(&app, vec![("BAG-002", 1, dec!(100.00))]).await;
    let items_b = order_items_of(&app, sale_b.receipt.order_id).await;

    let err = app
        .state
        .return_service
        .process(return_request(
            &sale_a.receipt.order_code,
            sale_a.staff_id,
            vec![ReturnLineInput {
                order_item_id: items_b[0].id,
                qty: 1,
            }],
            vec![],
        ))
        .await
        .expect_err("cannot return another order's item");

    assert_matches!(err, ServiceError::ValidationError(_));
    assert_eq!(
        return_entity::Entity::find().count(app.db()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn unknown_order_reference_is_not_found() {
    let app = TestApp::new().await;
    let err = app
        .state
        .return_service
        .lookup("ZZZZZZ")
        .await
        .expect_err("unknown order");
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn empty_return_request_is_a_validation_error() {
    let app = TestApp::new().await;
    app.seed_sku("BAG-001", dec!(100.00), 5).await;
    let sale = sell(&app, vec![("BAG-001", 1, dec!(100.00))]).await;

    let err = app
        .state
        .return_service
        .process(return_request(
            &sale.receipt.order_code,
            sale.staff_id,
            vec![],
            vec![],
        ))
        .await
        .expect_err("nothing to do");
    assert_matches!(err, ServiceError::ValidationError(_));
}
