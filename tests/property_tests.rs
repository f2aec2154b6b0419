//! Property-based tests for the engine's pure logic.
//!
//! These use proptest to verify invariants across a wide range of inputs:
//! discounts never exceed what the cart is worth, the status resolver is
//! total and consistent, and returned-quantity accounting never escapes its
//! bounds under arbitrary return sequences.

use aurelion_pos::entities::{
    order::{OrderStatus, OrderType},
    order_item,
    promotion::{self, PromotionScope, PromotionType, TierRestriction},
};
use aurelion_pos::services::{order_status, promotions};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

fn promo(promo_type: PromotionType, discount_value: Decimal, now: DateTime<Utc>) -> promotion::Model {
    promotion::Model {
        id: Uuid::new_v4(),
        name: "Prop".into(),
        code: None,
        description: None,
        promo_type,
        discount_value,
        buy_quantity: 2,
        get_quantity: 1,
        silver_discount: Decimal::from(5),
        gold_discount: Decimal::from(10),
        platinum_discount: Decimal::from(15),
        applies_to: PromotionScope::All,
        category: None,
        brand: None,
        customer_tier: TierRestriction::All,
        min_purchase: Decimal::ZERO,
        min_items: 0,
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(1),
        is_active: true,
        max_uses: 0,
        used_count: 0,
        max_uses_per_customer: 0,
        created_by: None,
        created_at: now,
    }
}

fn cart_line(qty: i32, price_cents: i64) -> promotions::CartLine {
    promotions::CartLine {
        variant_id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        sku: "SKU".into(),
        product_name: "Product".into(),
        color: "Black".into(),
        size: "M".into(),
        category: "Bags".into(),
        brand: "Gucci".into(),
        quantity: qty,
        unit_price: Decimal::new(price_cents, 2),
    }
}

fn lines_strategy() -> impl Strategy<Value = Vec<promotions::CartLine>> {
    prop::collection::vec((1i32..6, 100i64..500_000), 1..6)
        .prop_map(|specs| specs.into_iter().map(|(q, p)| cart_line(q, p)).collect())
}

proptest! {
    #[test]
    fn percentage_discount_stays_within_the_subtotal(
        lines in lines_strategy(),
        pct in 0i64..=100,
    ) {
        let now = Utc::now();
        let rule = promotions::PromotionRule {
            promotion: promo(PromotionType::Percentage, Decimal::from(pct), now),
            product_ids: HashSet::new(),
        };
        let subtotal: Decimal = lines.iter().map(|l| l.line_total()).sum();
        let d = promotions::calculate_discount(&rule, &lines, None, now);
        prop_assert!(d.amount >= Decimal::ZERO);
        // Allow the half-cent the final rounding may add.
        prop_assert!(d.amount <= subtotal + Decimal::new(1, 2));
    }

    #[test]
    fn fixed_discount_never_exceeds_the_subtotal(
        lines in lines_strategy(),
        value_cents in 0i64..10_000_000,
    ) {
        let now = Utc::now();
        let rule = promotions::PromotionRule {
            promotion: promo(PromotionType::Fixed, Decimal::new(value_cents, 2), now),
            product_ids: HashSet::new(),
        };
        let subtotal: Decimal = lines.iter().map(|l| l.line_total()).sum();
        let d = promotions::calculate_discount(&rule, &lines, None, now);
        prop_assert!(d.amount >= Decimal::ZERO);
        prop_assert!(d.amount <= subtotal);
    }

    #[test]
    fn bogo_discount_is_bounded_by_the_subtotal(lines in lines_strategy()) {
        let now = Utc::now();
        let rule = promotions::PromotionRule {
            promotion: promo(PromotionType::Bogo, Decimal::ZERO, now),
            product_ids: HashSet::new(),
        };
        let subtotal: Decimal = lines.iter().map(|l| l.line_total()).sum();
        let d = promotions::calculate_discount(&rule, &lines, None, now);
        prop_assert!(d.amount >= Decimal::ZERO);
        prop_assert!(d.amount <= subtotal);
    }
}

fn item(quantity: i32, qty_returned: i32) -> order_item::Model {
    order_item::Model {
        id: Uuid::new_v4(),
        order_id: Uuid::new_v4(),
        variant_id: Uuid::new_v4(),
        quantity,
        unit_price: Decimal::from(10),
        line_discount: Decimal::ZERO,
        qty_returned,
    }
}

proptest! {
    #[test]
    fn status_resolver_is_total_and_consistent(
        specs in prop::collection::vec((1i32..10).prop_flat_map(|q| (Just(q), 0i32..=q)), 0..8)
    ) {
        let items: Vec<_> = specs.iter().map(|&(q, r)| item(q, r)).collect();
        let status = order_status::resolve(OrderType::Sale, OrderStatus::Completed, &items);

        if items.is_empty() {
            prop_assert_eq!(status, OrderStatus::Completed);
        } else if items.iter().all(|i| i.is_fully_returned()) {
            prop_assert_eq!(status, OrderStatus::FullyReturned);
        } else if items.iter().any(|i| i.qty_returned > 0) {
            prop_assert_eq!(status, OrderStatus::PartiallyReturned);
        } else {
            prop_assert_eq!(status, OrderStatus::Completed);
        }
    }

    /// Simulates the guarded qty_returned increment over arbitrary return
    /// attempts: accepted returns keep 0 <= qty_returned <= quantity at
    /// every step, whatever the request stream looks like.
    #[test]
    fn guarded_returns_never_escape_quantity_bounds(
        quantity in 1i32..10,
        attempts in prop::collection::vec(1i32..12, 1..20),
    ) {
        let mut qty_returned = 0i32;
        for qty in attempts {
            // Mirror of the engine's guard: apply only when the increment
            // stays within the purchased quantity.
            if qty_returned <= quantity - qty {
                qty_returned += qty;
            }
            prop_assert!(qty_returned >= 0);
            prop_assert!(qty_returned <= quantity);
        }
    }
}
