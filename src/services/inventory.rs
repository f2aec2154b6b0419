use crate::{
    entities::product_variant::{self, Entity as ProductVariant},
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Result of a stock sufficiency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    Sufficient,
    Insufficient { available: i32 },
}

/// Result of a guarded stock deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductOutcome {
    Deducted,
    Insufficient { available: i32 },
}

/// Reads the current on-hand quantity for a variant.
pub async fn on_hand<C: ConnectionTrait>(conn: &C, variant_id: Uuid) -> Result<i32, ServiceError> {
    let variant = ProductVariant::find_by_id(variant_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Variant {} not found", variant_id)))?;
    Ok(variant.on_hand)
}

/// Checks whether `qty` units of a variant are available.
pub async fn check_availability<C: ConnectionTrait>(
    conn: &C,
    variant_id: Uuid,
    qty: i32,
) -> Result<StockStatus, ServiceError> {
    let available = on_hand(conn, variant_id).await?;
    if available >= qty {
        Ok(StockStatus::Sufficient)
    } else {
        Ok(StockStatus::Insufficient { available })
    }
}

/// Deducts `qty` units from a variant's on-hand quantity.
///
/// The decrement is a single conditional statement
/// (`SET on_hand = on_hand - qty WHERE id = ? AND on_hand >= qty`), so
/// concurrent checkouts against the same variant serialize on the row and
/// on-hand can never be observed negative. When the guard fails the current
/// availability is re-read and reported; the caller aborts its transaction.
pub async fn try_deduct<C: ConnectionTrait>(
    conn: &C,
    variant_id: Uuid,
    qty: i32,
) -> Result<DeductOutcome, ServiceError> {
    if qty <= 0 {
        return Err(ServiceError::ValidationError(format!(
            "Deduction quantity must be positive, got {}",
            qty
        )));
    }

    let result = ProductVariant::update_many()
        .col_expr(
            product_variant::Column::OnHand,
            Expr::col(product_variant::Column::OnHand).sub(qty),
        )
        .filter(product_variant::Column::Id.eq(variant_id))
        .filter(product_variant::Column::OnHand.gte(qty))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let available = on_hand(conn, variant_id).await?;
        return Ok(DeductOutcome::Insufficient { available });
    }

    Ok(DeductOutcome::Deducted)
}

/// Adds `qty` units back to a variant's on-hand quantity (restock from a
/// return). Atomic increment; fails if the variant does not exist.
pub async fn restock<C: ConnectionTrait>(
    conn: &C,
    variant_id: Uuid,
    qty: i32,
) -> Result<(), ServiceError> {
    if qty <= 0 {
        return Err(ServiceError::ValidationError(format!(
            "Restock quantity must be positive, got {}",
            qty
        )));
    }

    let result = ProductVariant::update_many()
        .col_expr(
            product_variant::Column::OnHand,
            Expr::col(product_variant::Column::OnHand).add(qty),
        )
        .filter(product_variant::Column::Id.eq(variant_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "Variant {} not found",
            variant_id
        )));
    }

    Ok(())
}

/// External-facing inventory contract, addressed by SKU.
///
/// The checkout and return engines do not go through this service; they call
/// the module-level primitives on their own transaction.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    async fn variant_by_sku(&self, sku: &str) -> Result<product_variant::Model, ServiceError> {
        ProductVariant::find()
            .filter(product_variant::Column::Sku.eq(sku))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::SkuNotFound(sku.to_string()))
    }

    /// Checks whether `qty` units of the SKU are on hand.
    #[instrument(skip(self))]
    pub async fn check_availability(
        &self,
        sku: &str,
        qty: i32,
    ) -> Result<StockStatus, ServiceError> {
        let variant = self.variant_by_sku(sku).await?;
        check_availability(&*self.db, variant.id, qty).await
    }

    /// Restocks a SKU outside of a return flow (e.g. received goods).
    #[instrument(skip(self))]
    pub async fn restock_sku(&self, sku: &str, qty: i32) -> Result<(), ServiceError> {
        let variant = self.variant_by_sku(sku).await?;
        restock(&*self.db, variant.id, qty).await?;

        info!(sku = %sku, qty, "Restocked variant");
        self.event_sender
            .send_or_log(Event::StockRestocked {
                variant_id: variant.id,
                quantity: qty,
            })
            .await;
        Ok(())
    }
}
