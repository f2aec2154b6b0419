use crate::{
    entities::{
        client::{self, Entity as Client},
        location::Entity as Location,
        order::{self, OrderStatus, OrderType},
        order_item,
        product::{self, Entity as Product},
        product_variant::{self, Entity as ProductVariant},
        staff::{Entity as Staff, StaffRole},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{inventory, loyalty, order_code, promotions},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// One cart line as submitted by the register.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartLineInput {
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub qty: i32,
    pub unit_price: Decimal,
}

/// Checkout request: what the register sends when the cashier rings a sale.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate]
    pub items: Vec<CartLineInput>,
    pub client_id: Option<Uuid>,
    pub promo_code: Option<String>,
    /// Manual discount granted at the register, on top of any promotion.
    pub manual_discount: Option<Decimal>,
    pub staff_id: Uuid,
    pub location_id: Uuid,
}

/// Discount preview request: same shape as checkout minus the commitment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PreviewRequest {
    #[validate]
    pub items: Vec<CartLineInput>,
    pub client_id: Option<Uuid>,
    pub promo_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptLine {
    pub name: String,
    pub sku: String,
    pub color: String,
    pub size: String,
    pub qty: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Receipt returned to the register after a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub order_id: Uuid,
    pub order_code: String,
    pub client: String,
    pub cashier: String,
    pub items: Vec<ReceiptLine>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub discount_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Discount preview result; nothing was persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountPreview {
    pub discount: Decimal,
    pub description: String,
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// A cart line resolved against the catalog.
struct ResolvedLine {
    variant: product_variant::Model,
    product: product::Model,
    qty: i32,
    unit_price: Decimal,
}

impl ResolvedLine {
    fn to_cart_line(&self) -> promotions::CartLine {
        promotions::CartLine {
            variant_id: self.variant.id,
            product_id: self.product.id,
            sku: self.variant.sku.clone(),
            product_name: self.product.display_name(),
            color: self.variant.color.clone(),
            size: self.variant.size.clone(),
            category: self.product.category.clone(),
            brand: self.product.brand.clone(),
            quantity: self.qty,
            unit_price: self.unit_price,
        }
    }

    fn to_receipt_line(&self) -> ReceiptLine {
        ReceiptLine {
            name: self.product.display_name(),
            sku: self.variant.sku.clone(),
            color: self.variant.color.clone(),
            size: self.variant.size.clone(),
            qty: self.qty,
            unit_price: self.unit_price,
            line_total: self.unit_price * Decimal::from(self.qty),
        }
    }

    fn insufficient_stock_error(&self, available: i32) -> ServiceError {
        ServiceError::InsufficientStock {
            product: self.product.display_name(),
            variant: self.variant.descriptor(),
            available,
            requested: self.qty,
        }
    }
}

/// The resolved promotion outcome of a checkout or preview.
struct AppliedPromotion {
    rule: promotions::PromotionRule,
    discount: promotions::Discount,
    from_code: bool,
}

/// Order engine: executes a sale against live inventory in one atomic
/// transaction with stock-sufficiency guarantees.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CheckoutService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Executes a checkout.
    ///
    /// Everything between stock validation and the totals write happens in
    /// one transaction; any failure leaves no orphan items, no partial stock
    /// decrements, and no usage-counter drift.
    #[instrument(skip(self, request), fields(staff_id = %request.staff_id, lines = request.items.len()))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<Receipt, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if request.items.is_empty() {
            return Err(ServiceError::ValidationError("No items provided".into()));
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
                "Checkout requires the cashier role".into(),
            ));
        }

        Location::find_by_id(request.location_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Location {} not found", request.location_id))
            })?;

        // An unknown client id degrades to a walk-in sale rather than
        // failing the checkout.
        let client = match request.client_id {
            Some(id) => Client::find_by_id(id).one(db).await?,
            None => None,
        };
        let customer = match &client {
            Some(c) => Some(promotions::CustomerProfile {
                client_id: c.id,
                tier: loyalty::effective_tier(db, c).await?,
            }),
            None => None,
        };

        let txn = db.begin().await?;

        let lines = resolve_lines(&txn, &request.items).await?;
        for line in &lines {
            if line.variant.on_hand < line.qty {
                return Err(line.insufficient_stock_error(line.variant.on_hand));
            }
        }

        let order_id = Uuid::new_v4();
        let code = order_code::generate(&txn).await?;

        let order_row = order::ActiveModel {
            id: Set(order_id),
            order_code: Set(code.clone()),
            order_type: Set(OrderType::Sale),
            status: Set(OrderStatus::Completed),
            client_id: Set(client.as_ref().map(|c| c.id)),
            location_id: Set(request.location_id),
            created_by: Set(staff.id),
            total_amount: Set(Decimal::ZERO),
            total_discount: Set(Decimal::ZERO),
            parent_order_id: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };
        let order_row = order_row.insert(&txn).await?;

        let mut subtotal = Decimal::ZERO;
        for line in &lines {
            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                variant_id: Set(line.variant.id),
                quantity: Set(line.qty),
                unit_price: Set(line.unit_price),
                line_discount: Set(Decimal::ZERO),
                qty_returned: Set(0),
            };
            item.insert(&txn).await?;

            // Guarded decrement closes the race the pre-check above leaves
            // open under concurrent checkouts.
            match inventory::try_deduct(&txn, line.variant.id, line.qty).await? {
                inventory::DeductOutcome::Deducted => {}
                inventory::DeductOutcome::Insufficient { available } => {
                    return Err(line.insufficient_stock_error(available));
                }
            }

            subtotal += line.unit_price * Decimal::from(line.qty);
        }

        let cart_lines: Vec<promotions::CartLine> =
            lines.iter().map(ResolvedLine::to_cart_line).collect();

        let mut applied = resolve_promotion(
            &txn,
            request.promo_code.as_deref(),
            &cart_lines,
            customer.as_ref(),
            now,
        )
        .await?;

        let mut promo_discount = Decimal::ZERO;
        let mut discount_label = None;
        if let Some(promo) = applied.take() {
            let recorded = promotions::record_usage(
                &txn,
                promo.rule.promotion.id,
                client.as_ref().map(|c| c.id),
                order_id,
                promo.discount.amount,
                now,
            )
            .await?;

            if recorded {
                promo_discount = promo.discount.amount;
                discount_label = Some(format!(
                    "{}: {}",
                    promo.rule.promotion.name, promo.discount.label
                ));
                applied = Some(promo);
            } else if promo.from_code {
                // A concurrent checkout exhausted the code's usage cap.
                return Err(ServiceError::InvalidPromoCode(
                    promo.rule.promotion.code.clone().unwrap_or_default(),
                ));
            }
        }

        let manual_discount = request.manual_discount.unwrap_or(Decimal::ZERO);
        let total_discount = manual_discount + promo_discount;
        // Not clamped: a misconfigured promotion surfacing a negative total
        // is visible to the operator instead of silently corrected.
        let total_amount = subtotal - total_discount;

        let mut order_update: order::ActiveModel = order_row.into();
        order_update.total_amount = Set(total_amount);
        order_update.total_discount = Set(total_discount);
        order_update.update(&txn).await?;

        txn.commit().await?;

        info!(order_code = %code, %total_amount, "Checkout completed");

        self.event_sender
            .send_or_log(Event::OrderCompleted {
                order_id,
                order_code: code.clone(),
                total_amount,
            })
            .await;
        for line in &lines {
            self.event_sender
                .send_or_log(Event::StockDeducted {
                    variant_id: line.variant.id,
                    quantity: line.qty,
                })
                .await;
        }
        if let Some(promo) = &applied {
            self.event_sender
                .send_or_log(Event::PromotionApplied {
                    promotion_id: promo.rule.promotion.id,
                    order_id,
                    discount_amount: promo_discount,
                })
                .await;
        }

        let client_label = client
            .as_ref()
            .map(client::Model::display_name)
            .unwrap_or_else(|| "Walk-in".to_string());

        Ok(Receipt {
            order_id,
            order_code: code,
            client: client_label,
            cashier: staff.username,
            items: lines.iter().map(ResolvedLine::to_receipt_line).collect(),
            subtotal,
            discount: total_discount,
            total: total_amount,
            discount_label,
            created_at: now,
        })
    }

    /// Computes the discount a cart would receive without creating anything:
    /// no usage counters, no stock movement, no order.
    #[instrument(skip(self, request))]
    pub async fn preview_discount(
        &self,
        request: PreviewRequest,
    ) -> Result<DiscountPreview, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db;
        let now = Utc::now();

        let client = match request.client_id {
            Some(id) => Client::find_by_id(id).one(db).await?,
            None => None,
        };
        let customer = match &client {
            Some(c) => Some(promotions::CustomerProfile {
                client_id: c.id,
                tier: loyalty::effective_tier(db, c).await?,
            }),
            None => None,
        };

        // Unknown SKUs are skipped in previews; the register may be ahead
        // of the catalog while an item is being keyed in.
        let mut cart_lines = Vec::new();
        let mut subtotal = Decimal::ZERO;
        for input in &request.items {
            let found = ProductVariant::find()
                .filter(product_variant::Column::Sku.eq(input.sku.as_str()))
                .find_also_related(Product)
                .one(db)
                .await?;
            let Some((variant, Some(product))) = found else {
                continue;
            };
            let line = ResolvedLine {
                variant,
                product,
                qty: input.qty,
                unit_price: input.unit_price,
            };
            subtotal += line.unit_price * Decimal::from(line.qty);
            cart_lines.push(line.to_cart_line());
        }

        if cart_lines.is_empty() {
            return Ok(DiscountPreview {
                discount: Decimal::ZERO,
                description: String::new(),
                subtotal: Decimal::ZERO,
                total: Decimal::ZERO,
            });
        }

        let applied = resolve_promotion(
            db,
            request.promo_code.as_deref(),
            &cart_lines,
            customer.as_ref(),
            now,
        )
        .await?;

        let (discount, description) = match applied {
            Some(promo) => (
                promo.discount.amount,
                format!("{}: {}", promo.rule.promotion.name, promo.discount.label),
            ),
            None => (Decimal::ZERO, String::new()),
        };

        Ok(DiscountPreview {
            discount,
            description,
            subtotal,
            total: subtotal - discount,
        })
    }
}

/// Resolves request lines against the catalog; any unknown SKU fails the
/// whole checkout.
async fn resolve_lines<C: ConnectionTrait>(
    conn: &C,
    items: &[CartLineInput],
) -> Result<Vec<ResolvedLine>, ServiceError> {
    let mut lines = Vec::with_capacity(items.len());
    for input in items {
        let found = ProductVariant::find()
            .filter(product_variant::Column::Sku.eq(input.sku.as_str()))
            .find_also_related(Product)
            .one(conn)
            .await?;
        let Some((variant, Some(product))) = found else {
            return Err(ServiceError::SkuNotFound(input.sku.clone()));
        };
        lines.push(ResolvedLine {
            variant,
            product,
            qty: input.qty,
            unit_price: input.unit_price,
        });
    }
    Ok(lines)
}

/// Shared promotion resolution for checkout and preview.
///
/// An explicitly supplied code is evaluated alone and must resolve to a
/// currently-valid promotion, or the request fails with InvalidPromoCode.
/// When the code yields no discount (or no code was given), all codeless
/// active promotions are scanned and the single highest discount wins.
async fn resolve_promotion<C: ConnectionTrait>(
    conn: &C,
    promo_code: Option<&str>,
    cart_lines: &[promotions::CartLine],
    customer: Option<&promotions::CustomerProfile>,
    now: DateTime<Utc>,
) -> Result<Option<AppliedPromotion>, ServiceError> {
    if let Some(raw) = promo_code {
        let normalized = raw.trim().to_uppercase();
        if !normalized.is_empty() {
            let promo = promotions::find_by_code(conn, &normalized)
                .await?
                .ok_or_else(|| ServiceError::InvalidPromoCode(normalized.clone()))?;
            if !promo.is_currently_valid(now) {
                return Err(ServiceError::InvalidPromoCode(normalized));
            }

            let rule = promotions::load_rule(conn, promo).await?;
            let discount = promotions::calculate_discount(&rule, cart_lines, customer, now);
            if discount.amount > Decimal::ZERO {
                return Ok(Some(AppliedPromotion {
                    rule,
                    discount,
                    from_code: true,
                }));
            }
            // Valid code, zero benefit for this cart: fall through to
            // auto-discovery rather than punish the customer.
        }
    }

    let rules = promotions::active_codeless_rules(conn, now).await?;
    if let Some((idx, discount)) = promotions::best_discount(&rules, cart_lines, customer, now) {
        if let Some(rule) = rules.into_iter().nth(idx) {
            return Ok(Some(AppliedPromotion {
                rule,
                discount,
                from_code: false,
            }));
        }
    }

    Ok(None)
}
