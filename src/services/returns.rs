use crate::{
    entities::{
        client::{self, Entity as Client},
        order::{self, Entity as Order, OrderStatus, OrderType},
        order_item::{self, Entity as OrderItem},
        product::{self, Entity as Product},
        product_variant::{self, Entity as ProductVariant},
        return_entity::{self, ReturnAction, ReturnReason},
        return_item,
        staff::{Entity as Staff, StaffRole},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{inventory, order_code, order_status},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Days after purchase during which items remain eligible for return,
/// measured in whole days since the order was created.
pub const RETURN_WINDOW_DAYS: i64 = 10;

/// Per-item returnability classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemReturnability {
    Returnable,
    AlreadyReturned,
    NotEligible,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReturnableItem {
    pub order_item_id: Uuid,
    pub sku: String,
    pub name: String,
    pub color: String,
    pub size: String,
    pub qty_remaining: i32,
    pub original_qty: i32,
    pub returned_qty: i32,
    pub unit_price: Decimal,
    pub status: ItemReturnability,
}

/// Lookup result: the order is eligible and these are its lines.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnEligibility {
    pub order_id: Uuid,
    pub order_code: String,
    pub client: String,
    pub items: Vec<ReturnableItem>,
    pub created_at: DateTime<Utc>,
    pub days_since_purchase: i64,
    pub return_window_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReturnLineInput {
    pub order_item_id: Uuid,
    #[validate(range(min = 1, message = "Return quantity must be at least 1"))]
    pub qty: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplacementLineInput {
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub qty: i32,
    pub unit_price: Decimal,
}

/// Return/exchange commit request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReturnCheckoutRequest {
    #[validate(length(min = 1, message = "Order code is required"))]
    pub order_ref: String,
    pub reason: ReturnReason,
    pub action: ReturnAction,
    #[validate]
    pub return_items: Vec<ReturnLineInput>,
    #[validate]
    pub replacement_items: Vec<ReplacementLineInput>,
    pub staff_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReturnLineDetail {
    pub name: String,
    pub sku: String,
    pub color: String,
    pub size: String,
    pub qty: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Outcome of a committed return/exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnOutcome {
    pub return_id: Uuid,
    pub original_order_code: String,
    pub original_order_status: OrderStatus,
    pub refund_amount: Decimal,
    pub exchange_order_code: Option<String>,
    pub exchange_total: Decimal,
    /// Positive: the customer owes more; negative: the customer is owed.
    pub net_due: Decimal,
    pub action: ReturnAction,
    pub reason: ReturnReason,
    pub returned_items: Vec<ReturnLineDetail>,
    pub replacement_items: Vec<ReturnLineDetail>,
    pub cashier: String,
    pub client: String,
    pub created_at: DateTime<Utc>,
}

/// Return/exchange engine: validates eligibility against a prior sale,
/// restocks returned units, optionally creates a linked exchange order, and
/// keeps the parent order's status consistent.
#[derive(Clone)]
pub struct ReturnService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ReturnService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Looks up an order and classifies each of its lines for returnability.
    #[instrument(skip(self))]
    pub async fn lookup(&self, order_ref: &str) -> Result<ReturnEligibility, ServiceError> {
        let db = &*self.db;
        let order = find_order(db, order_ref).await?;

        if order.order_type == OrderType::Return {
            return Err(ServiceError::ReturnNotAllowed(
                "This is a return/refund order and cannot be returned again.".into(),
            ));
        }
        if order.status == OrderStatus::FullyReturned {
            return Err(ServiceError::ReturnNotAllowed(
                "This order has already been fully returned. No items are available for return or exchange.".into(),
            ));
        }

        let now = Utc::now();
        let days_since_purchase = (now - order.created_at).num_days();
        let within_window = days_since_purchase <= RETURN_WINDOW_DAYS;

        let order_items = OrderItem::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .all(db)
            .await?;

        let mut items = Vec::with_capacity(order_items.len());
        let mut has_returnable = false;
        for item in &order_items {
            let (variant, product) = variant_with_product(db, item.variant_id).await?;
            let qty_remaining = item.qty_remaining();

            let status = if qty_remaining == 0 {
                ItemReturnability::AlreadyReturned
            } else if !within_window {
                ItemReturnability::NotEligible
            } else {
                has_returnable = true;
                ItemReturnability::Returnable
            };

            items.push(ReturnableItem {
                order_item_id: item.id,
                sku: variant.sku.clone(),
                name: product.display_name(),
                color: variant.color.clone(),
                size: variant.size.clone(),
                qty_remaining,
                original_qty: item.quantity,
                returned_qty: item.qty_returned,
                unit_price: item.unit_price,
                status,
            });
        }

        if !has_returnable {
            let any_already_returned = items
                .iter()
                .any(|i| i.status == ItemReturnability::AlreadyReturned);
            return Err(ServiceError::ReturnNotAllowed(if any_already_returned {
                "This order has already been fully returned. No items are available for return or exchange.".into()
            } else {
                "No items are eligible for return. Return window has expired.".into()
            }));
        }

        let client_label = client_label(db, order.client_id).await?;

        Ok(ReturnEligibility {
            order_id: order.id,
            order_code: order.order_code.clone(),
            client: client_label,
            items,
            created_at: order.created_at,
            days_since_purchase,
            return_window_days: RETURN_WINDOW_DAYS,
        })
    }

    /// Commits a return/exchange in one atomic transaction.
    ///
    /// Quantities are re-validated against `qty_remaining` at commit time,
    /// not just at lookup time, so a racing return cannot push a line past
    /// its purchased quantity. Any failure rolls back every mutation.
    #[instrument(skip(self, request), fields(order_ref = %request.order_ref, staff_id = %request.staff_id))]
    pub async fn process(
        &self,
        request: ReturnCheckoutRequest,
    ) -> Result<ReturnOutcome, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if request.return_items.is_empty() && request.replacement_items.is_empty() {
            return Err(ServiceError::ValidationError(
                "No return or replacement items provided".into(),
            ));
        }

        let db = &*self.db;
        let now = Utc::now();

        let staff = Staff::find_by_id(request.staff_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Staff {} not found", request.staff_id))
            })?;
        if !staff.role.satisfies(StaffRole::Cashier) {
            return Err(ServiceError::Forbidden(
                "Processing returns requires the cashier role".into(),
            ));
        }

        let order = find_order(db, &request.order_ref).await?;
        if order.order_type == OrderType::Return {
            return Err(ServiceError::ReturnNotAllowed(
                "This is a return/refund order and cannot be returned again.".into(),
            ));
        }
        if order.status == OrderStatus::FullyReturned {
            return Err(ServiceError::ReturnNotAllowed(
                "This order has already been fully returned. No items are available for return or exchange.".into(),
            ));
        }

        let txn = db.begin().await?;

        // Replacement stock is validated before anything mutates, so a
        // doomed exchange never restocks the returned units first.
        let mut replacements = Vec::with_capacity(request.replacement_items.len());
        for input in &request.replacement_items {
            let (variant, product) = variant_by_sku(&txn, &input.sku).await?;
            if variant.on_hand < input.qty {
                return Err(ServiceError::InsufficientStock {
                    product: product.display_name(),
                    variant: variant.descriptor(),
                    available: variant.on_hand,
                    requested: input.qty,
                });
            }
            replacements.push((variant, product, input.qty, input.unit_price));
        }

        let return_id = Uuid::new_v4();
        let return_row = return_entity::ActiveModel {
            id: Set(return_id),
            original_order_id: Set(order.id),
            refund_order_id: Set(None),
            replacement_order_id: Set(None),
            reason: Set(request.reason),
            action: Set(request.action),
            created_by: Set(staff.id),
            created_at: Set(now),
        };
        let return_row = return_row.insert(&txn).await?;

        let mut refund_amount = Decimal::ZERO;
        let mut returned_lines = Vec::with_capacity(request.return_items.len());
        let mut restocked = Vec::with_capacity(request.return_items.len());
        for input in &request.return_items {
            let item = OrderItem::find_by_id(input.order_item_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "Order item {} not found",
                        input.order_item_id
                    ))
                })?;
            if item.order_id != order.id {
                return Err(ServiceError::ValidationError(format!(
                    "Order item {} does not belong to order {}",
                    input.order_item_id, order.order_code
                )));
            }

            let (variant, product) = variant_with_product(&txn, item.variant_id).await?;

            // Guarded increment: qty_returned moves only if it stays within
            // the purchased quantity, closing the lookup-to-commit race.
            let result = OrderItem::update_many()
                .col_expr(
                    order_item::Column::QtyReturned,
                    Expr::col(order_item::Column::QtyReturned).add(input.qty),
                )
                .filter(order_item::Column::Id.eq(item.id))
                .filter(
                    Expr::col(order_item::Column::QtyReturned)
                        .lte(Expr::col(order_item::Column::Quantity).sub(input.qty)),
                )
                .exec(&txn)
                .await?;
            if result.rows_affected == 0 {
                return Err(ServiceError::ReturnNotAllowed(format!(
                    "Cannot return {} of {} ({}). Only {} remaining (already returned {}).",
                    input.qty,
                    product.display_name(),
                    variant.descriptor(),
                    item.qty_remaining(),
                    item.qty_returned
                )));
            }

            let return_item_row = return_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                return_id: Set(return_id),
                order_item_id: Set(item.id),
                quantity: Set(input.qty),
                reason: Set(Some(request.reason)),
            };
            return_item_row.insert(&txn).await?;

            inventory::restock(&txn, item.variant_id, input.qty).await?;
            restocked.push((item.variant_id, input.qty));

            refund_amount += item.unit_price * Decimal::from(input.qty);
            returned_lines.push(ReturnLineDetail {
                name: product.display_name(),
                sku: variant.sku.clone(),
                color: variant.color.clone(),
                size: variant.size.clone(),
                qty: input.qty,
                unit_price: item.unit_price,
                line_total: item.unit_price * Decimal::from(input.qty),
            });
        }

        let mut replacement_total = Decimal::ZERO;
        let mut replacement_lines = Vec::with_capacity(replacements.len());
        for (variant, product, qty, unit_price) in &replacements {
            match inventory::try_deduct(&txn, variant.id, *qty).await? {
                inventory::DeductOutcome::Deducted => {}
                inventory::DeductOutcome::Insufficient { available } => {
                    return Err(ServiceError::InsufficientStock {
                        product: product.display_name(),
                        variant: variant.descriptor(),
                        available,
                        requested: *qty,
                    });
                }
            }

            replacement_total += *unit_price * Decimal::from(*qty);
            replacement_lines.push(ReturnLineDetail {
                name: product.display_name(),
                sku: variant.sku.clone(),
                color: variant.color.clone(),
                size: variant.size.clone(),
                qty: *qty,
                unit_price: *unit_price,
                line_total: *unit_price * Decimal::from(*qty),
            });
        }

        let mut exchange_order_code = None;
        let mut exchange_order_id = None;
        if !replacements.is_empty() {
            let code = order_code::generate(&txn).await?;
            let exchange_id = Uuid::new_v4();
            let exchange_row = order::ActiveModel {
                id: Set(exchange_id),
                order_code: Set(code.clone()),
                order_type: Set(OrderType::Exchange),
                status: Set(OrderStatus::Completed),
                client_id: Set(order.client_id),
                location_id: Set(order.location_id),
                created_by: Set(staff.id),
                total_amount: Set(replacement_total),
                total_discount: Set(Decimal::ZERO),
                parent_order_id: Set(Some(order.id)),
                created_at: Set(now),
                updated_at: Set(Some(now)),
            };
            exchange_row.insert(&txn).await?;

            for (variant, _, qty, unit_price) in &replacements {
                let item = order_item::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    order_id: Set(exchange_id),
                    variant_id: Set(variant.id),
                    quantity: Set(*qty),
                    unit_price: Set(*unit_price),
                    line_discount: Set(Decimal::ZERO),
                    qty_returned: Set(0),
                };
                item.insert(&txn).await?;
            }

            let mut return_update: return_entity::ActiveModel = return_row.clone().into();
            return_update.replacement_order_id = Set(Some(exchange_id));
            return_update.update(&txn).await?;

            exchange_order_code = Some(code);
            exchange_order_id = Some(exchange_id);
        }

        let new_status = order_status::recompute_and_persist(&txn, &order).await?;

        txn.commit().await?;

        info!(
            order_code = %order.order_code,
            %refund_amount,
            %replacement_total,
            new_status = new_status.as_str(),
            "Return processed"
        );

        self.event_sender
            .send_or_log(Event::ReturnProcessed {
                return_id,
                order_id: order.id,
                refund_amount,
            })
            .await;
        for (variant_id, qty) in &restocked {
            self.event_sender
                .send_or_log(Event::StockRestocked {
                    variant_id: *variant_id,
                    quantity: *qty,
                })
                .await;
        }
        if new_status != order.status {
            self.event_sender
                .send_or_log(Event::OrderStatusChanged {
                    order_id: order.id,
                    old_status: order.status.as_str().to_string(),
                    new_status: new_status.as_str().to_string(),
                })
                .await;
        }
        if let Some(exchange_id) = exchange_order_id {
            self.event_sender
                .send_or_log(Event::ExchangeCreated {
                    order_id: exchange_id,
                    parent_order_id: order.id,
                    total_amount: replacement_total,
                })
                .await;
        }

        let client_label = client_label(db, order.client_id).await?;

        Ok(ReturnOutcome {
            return_id,
            original_order_code: order.order_code.clone(),
            original_order_status: new_status,
            refund_amount,
            exchange_order_code,
            exchange_total: replacement_total,
            net_due: replacement_total - refund_amount,
            action: request.action,
            reason: request.reason,
            returned_items: returned_lines,
            replacement_items: replacement_lines,
            cashier: staff.username,
            client: client_label,
            created_at: now,
        })
    }
}

/// Resolves an order by its human-facing code, falling back to the raw id.
/// Input is normalized the way registers type it: trimmed, upper-cased,
/// leading `#` stripped.
async fn find_order<C: ConnectionTrait>(
    conn: &C,
    order_ref: &str,
) -> Result<order::Model, ServiceError> {
    let normalized = order_ref.trim().trim_start_matches('#').to_uppercase();
    if normalized.is_empty() {
        return Err(ServiceError::ValidationError("Order code is required".into()));
    }

    if let Some(order) = Order::find()
        .filter(order::Column::OrderCode.eq(normalized.as_str()))
        .one(conn)
        .await?
    {
        return Ok(order);
    }

    if let Ok(id) = Uuid::parse_str(order_ref.trim()) {
        if let Some(order) = Order::find_by_id(id).one(conn).await? {
            return Ok(order);
        }
    }

    Err(ServiceError::NotFound(format!(
        "Order not found with code \"{}\"",
        normalized
    )))
}

async fn variant_with_product<C: ConnectionTrait>(
    conn: &C,
    variant_id: Uuid,
) -> Result<(product_variant::Model, product::Model), ServiceError> {
    let found = ProductVariant::find_by_id(variant_id)
        .find_also_related(Product)
        .one(conn)
        .await?;
    match found {
        Some((variant, Some(product))) => Ok((variant, product)),
        _ => Err(ServiceError::NotFound(format!(
            "Variant {} not found",
            variant_id
        ))),
    }
}

async fn variant_by_sku<C: ConnectionTrait>(
    conn: &C,
    sku: &str,
) -> Result<(product_variant::Model, product::Model), ServiceError> {
    let found = ProductVariant::find()
        .filter(product_variant::Column::Sku.eq(sku))
        .find_also_related(Product)
        .one(conn)
        .await?;
    match found {
        Some((variant, Some(product))) => Ok((variant, product)),
        _ => Err(ServiceError::SkuNotFound(sku.to_string())),
    }
}

async fn client_label<C: ConnectionTrait>(
    conn: &C,
    client_id: Option<Uuid>,
) -> Result<String, ServiceError> {
    match client_id {
        Some(id) => Ok(Client::find_by_id(id)
            .one(conn)
            .await?
            .map(|c| client::Model::display_name(&c))
            .unwrap_or_else(|| "Walk-in".to_string())),
        None => Ok("Walk-in".to_string()),
    }
}
