//! Tests for the SKU-addressed inventory contract and the ledger
//! primitives' guard behavior.

mod common;

use assert_matches::assert_matches;
use aurelion_pos::{
    entities::product_variant,
    errors::ServiceError,
    services::inventory::{self, DeductOutcome, StockStatus},
};
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

#[tokio::test]
async fn availability_check_reports_shortfall() {
    let app = TestApp::new().await;
    app.seed_sku("BAG-001", dec!(100.00), 3).await;

    let status = app
        .state
        .inventory_service
        .check_availability("BAG-001", 3)
        .await
        .unwrap();
    assert_eq!(status, StockStatus::Sufficient);

    let status = app
        .state
        .inventory_service
        .check_availability("BAG-001", 4)
        .await
        .unwrap();
    assert_eq!(status, StockStatus::Insufficient { available: 3 });
}

#[tokio::test]
async fn availability_check_rejects_unknown_skus() {
    let app = TestApp::new().await;
    let err = app
        .state
        .inventory_service
        .check_availability("GHOST", 1)
        .await
        .expect_err("unknown sku");
    assert_matches!(err, ServiceError::SkuNotFound(sku) if sku == "GHOST");
}

#[tokio::test]
async fn restock_sku_increments_on_hand() {
    let app = TestApp::new().await;
    let variant = app.seed_sku("BAG-001", dec!(100.00), 2).await;

    app.state
        .inventory_service
        .restock_sku("BAG-001", 5)
        .await
        .unwrap();

    let refreshed = product_variant::Entity::find_by_id(variant.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.on_hand, 7);
}

#[tokio::test]
async fn guarded_deduct_refuses_to_go_below_zero() {
    let app = TestApp::new().await;
    let variant = app.seed_sku("BAG-001", dec!(100.00), 2).await;

    let outcome = inventory::try_deduct(app.db(), variant.id, 2).await.unwrap();
    assert_eq!(outcome, DeductOutcome::Deducted);

    let outcome = inventory::try_deduct(app.db(), variant.id, 1).await.unwrap();
    assert_eq!(outcome, DeductOutcome::Insufficient { available: 0 });

    let refreshed = product_variant::Entity::find_by_id(variant.id)
        .one(app.db())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.on_hand, 0);
}

#[tokio::test]
async fn zero_or_negative_quantities_are_rejected() {
    let app = TestApp::new().await;
    let variant = app.seed_sku("BAG-001", dec!(100.00), 2).await;

    let err = inventory::try_deduct(app.db(), variant.id, 0)
        .await
        .expect_err("zero deduct");
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = inventory::restock(app.db(), variant.id, -3)
        .await
        .expect_err("negative restock");
    assert_matches!(err, ServiceError::ValidationError(_));
}
