use crate::{
    entities::{
        client::LoyaltyTier,
        promotion::{self, Entity as Promotion, PromotionScope, PromotionType},
        promotion_product::{self, Entity as PromotionProduct},
        promotion_usage,
        promotion_usage::Entity as PromotionUsage,
    },
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// One cart line as the evaluator sees it: quantities, the price the sale is
/// ringing up at, and the product dimensions promotion scopes match against.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub variant_id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub product_name: String,
    pub color: String,
    pub size: String,
    pub category: String,
    pub brand: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The customer identity a promotion evaluates against.
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub client_id: Uuid,
    pub tier: LoyaltyTier,
}

/// A promotion plus its explicit product set (PRODUCTS scope), loaded once
/// so discount calculation itself stays pure.
#[derive(Debug, Clone)]
pub struct PromotionRule {
    pub promotion: promotion::Model,
    pub product_ids: HashSet<Uuid>,
}

/// Computed discount. `amount` is zero when the promotion does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    pub amount: Decimal,
    pub label: String,
}

impl Discount {
    fn none() -> Self {
        Discount {
            amount: Decimal::ZERO,
            label: String::new(),
        }
    }
}

/// Monetary results round to 2 decimal places with banker's rounding
/// (midpoint-nearest-even), matching the persistence precision.
fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

fn scope_matches(rule: &PromotionRule, line: &CartLine) -> bool {
    let promo = &rule.promotion;
    match promo.applies_to {
        PromotionScope::All => true,
        PromotionScope::Category => promo
            .category
            .as_deref()
            .is_some_and(|c| c == line.category),
        PromotionScope::Brand => promo.brand.as_deref().is_some_and(|b| b == line.brand),
        PromotionScope::Products => rule.product_ids.contains(&line.product_id),
    }
}

fn tier_allows(rule: &PromotionRule, customer: Option<&CustomerProfile>) -> bool {
    match rule.promotion.customer_tier.min_rank() {
        None => true,
        // A tier-restricted promotion needs a known customer.
        Some(min_rank) => customer.is_some_and(|c| c.tier.rank() >= min_rank),
    }
}

/// Computes the discount a single promotion yields for a cart.
///
/// Returns a zero discount when any eligibility gate fails: inactive or
/// out-of-date promotion, exhausted usage cap, unmet tier restriction, no
/// lines in scope, or unmet minimum purchase/item thresholds.
pub fn calculate_discount(
    rule: &PromotionRule,
    lines: &[CartLine],
    customer: Option<&CustomerProfile>,
    now: DateTime<Utc>,
) -> Discount {
    let promo = &rule.promotion;

    if !promo.is_currently_valid(now) {
        return Discount::none();
    }
    if !tier_allows(rule, customer) {
        return Discount::none();
    }

    let eligible: Vec<&CartLine> = lines.iter().filter(|l| scope_matches(rule, l)).collect();
    if eligible.is_empty() {
        return Discount::none();
    }

    let eligible_total: Decimal = eligible.iter().map(|l| l.line_total()).sum();
    let eligible_units: i32 = eligible.iter().map(|l| l.quantity).sum();

    if eligible_total < promo.min_purchase {
        return Discount::none();
    }
    if eligible_units < promo.min_items {
        return Discount::none();
    }

    let (amount, label) = match promo.promo_type {
        PromotionType::Percentage => {
            let amount = eligible_total * (promo.discount_value / Decimal::from(100));
            (amount, format!("{}% off", promo.discount_value.normalize()))
        }
        PromotionType::Fixed => {
            // Never discounts beyond the eligible subtotal.
            let amount = promo.discount_value.min(eligible_total);
            (amount, format!("${} off", promo.discount_value.normalize()))
        }
        PromotionType::Bogo => {
            let mut unit_prices: Vec<Decimal> = Vec::new();
            for line in &eligible {
                for _ in 0..line.quantity {
                    unit_prices.push(line.unit_price);
                }
            }
            unit_prices.sort();

            let set_size = promo.buy_quantity + promo.get_quantity;
            if set_size <= 0 {
                return Discount::none();
            }
            let sets = unit_prices.len() as i32 / set_size;
            let free_units = (sets * promo.get_quantity) as usize;
            if free_units == 0 {
                return Discount::none();
            }

            // The cheapest eligible units go free.
            let amount: Decimal = unit_prices[..free_units].iter().copied().sum();
            (
                amount,
                format!(
                    "Buy {} Get {} Free",
                    promo.buy_quantity, promo.get_quantity
                ),
            )
        }
        PromotionType::Tiered => {
            let rate = match customer.map(|c| c.tier) {
                Some(LoyaltyTier::Platinum) => promo.platinum_discount,
                Some(LoyaltyTier::Gold) => promo.gold_discount,
                Some(LoyaltyTier::Silver) => promo.silver_discount,
                Some(LoyaltyTier::Regular) | None => Decimal::ZERO,
            };
            if rate <= Decimal::ZERO {
                return Discount::none();
            }
            let amount = eligible_total * (rate / Decimal::from(100));
            (amount, format!("{}% VIP discount", rate.normalize()))
        }
        // Reserved type: no computation defined yet.
        PromotionType::Bundle => (Decimal::ZERO, String::new()),
    };

    let amount = round_money(amount);
    if amount <= Decimal::ZERO {
        return Discount::none();
    }

    Discount { amount, label }
}

/// Picks the best-paying rule for the cart: highest amount wins, first found
/// wins ties. `rules` must already be in the documented evaluation order
/// (newest promotion first, see [`active_codeless_rules`]).
pub fn best_discount(
    rules: &[PromotionRule],
    lines: &[CartLine],
    customer: Option<&CustomerProfile>,
    now: DateTime<Utc>,
) -> Option<(usize, Discount)> {
    let mut best: Option<(usize, Discount)> = None;

    for (idx, rule) in rules.iter().enumerate() {
        let discount = calculate_discount(rule, lines, customer, now);
        if discount.amount <= Decimal::ZERO {
            continue;
        }
        let beats_current = best
            .as_ref()
            .map_or(true, |(_, current)| discount.amount > current.amount);
        if beats_current {
            best = Some((idx, discount));
        }
    }

    best
}

/// Looks up a promotion by code, in any lifecycle state. Codes are stored
/// upper-cased; the input is normalized the same way.
pub async fn find_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> Result<Option<promotion::Model>, ServiceError> {
    let normalized = code.trim().to_uppercase();
    if normalized.is_empty() {
        return Ok(None);
    }

    Promotion::find()
        .filter(promotion::Column::Code.eq(normalized))
        .one(conn)
        .await
        .map_err(ServiceError::from)
}

/// Loads a promotion's explicit product set, making it ready for evaluation.
pub async fn load_rule<C: ConnectionTrait>(
    conn: &C,
    promotion: promotion::Model,
) -> Result<PromotionRule, ServiceError> {
    let product_ids = if promotion.applies_to == PromotionScope::Products {
        PromotionProduct::find()
            .filter(promotion_product::Column::PromotionId.eq(promotion.id))
            .all(conn)
            .await?
            .into_iter()
            .map(|link| link.product_id)
            .collect()
    } else {
        HashSet::new()
    };

    Ok(PromotionRule {
        promotion,
        product_ids,
    })
}

/// All activated, date-valid, codeless promotions, newest first — the
/// documented auto-discovery evaluation order.
pub async fn active_codeless_rules<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> Result<Vec<PromotionRule>, ServiceError> {
    let promos = Promotion::find()
        .filter(promotion::Column::IsActive.eq(true))
        .filter(promotion::Column::StartDate.lte(now))
        .filter(promotion::Column::EndDate.gte(now))
        .filter(
            Condition::any()
                .add(promotion::Column::Code.is_null())
                .add(promotion::Column::Code.eq("")),
        )
        .order_by_desc(promotion::Column::CreatedAt)
        .all(conn)
        .await?;

    let mut rules = Vec::with_capacity(promos.len());
    for promo in promos {
        rules.push(load_rule(conn, promo).await?);
    }
    Ok(rules)
}

/// Records one successful application: bumps `used_count` with a guarded
/// single-statement increment (`WHERE max_uses = 0 OR used_count < max_uses`)
/// and appends the PromotionUsage audit row. Returns `false` when a
/// concurrent checkout exhausted the cap first; the caller then drops the
/// discount (or fails, on the explicit-code path) without rolling back.
pub async fn record_usage<C: ConnectionTrait>(
    conn: &C,
    promotion_id: Uuid,
    client_id: Option<Uuid>,
    order_id: Uuid,
    discount_amount: Decimal,
    now: DateTime<Utc>,
) -> Result<bool, ServiceError> {
    let result = Promotion::update_many()
        .col_expr(
            promotion::Column::UsedCount,
            Expr::col(promotion::Column::UsedCount).add(1),
        )
        .filter(promotion::Column::Id.eq(promotion_id))
        .filter(
            Condition::any()
                .add(promotion::Column::MaxUses.eq(0))
                .add(
                    Expr::col(promotion::Column::UsedCount)
                        .lt(Expr::col(promotion::Column::MaxUses)),
                ),
        )
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        debug!(%promotion_id, "Usage cap exhausted under concurrency; promotion not applied");
        return Ok(false);
    }

    let usage = promotion_usage::ActiveModel {
        id: Set(Uuid::new_v4()),
        promotion_id: Set(promotion_id),
        client_id: Set(client_id),
        order_id: Set(order_id),
        discount_amount: Set(discount_amount),
        used_at: Set(now),
    };
    usage.insert(conn).await?;

    Ok(true)
}

/// Counts how often a client has used a promotion. Not consulted by the
/// eligibility gate (per-customer caps are stored but unenforced); exposed
/// for reporting collaborators.
pub async fn customer_usage_count<C: ConnectionTrait>(
    conn: &C,
    promotion_id: Uuid,
    client_id: Uuid,
) -> Result<u64, ServiceError> {
    use sea_orm::PaginatorTrait;

    PromotionUsage::find()
        .filter(promotion_usage::Column::PromotionId.eq(promotion_id))
        .filter(promotion_usage::Column::ClientId.eq(client_id))
        .count(conn)
        .await
        .map_err(ServiceError::from)
}
