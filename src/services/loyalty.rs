use crate::{
    entities::{
        client::{self, LoyaltyTier},
        order::{self, Entity as Order, OrderStatus},
    },
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

// Tier thresholds over completed-order history.
const PLATINUM_MIN_VISITS: usize = 12;
const GOLD_MIN_VISITS: usize = 6;
const PLATINUM_MIN_SPEND: i64 = 5000;
const GOLD_MIN_SPEND: i64 = 1000;

/// Maps completed-order history onto a loyalty tier.
pub fn tier_for(visits: usize, spend: Decimal) -> LoyaltyTier {
    if visits >= PLATINUM_MIN_VISITS && spend >= Decimal::from(PLATINUM_MIN_SPEND) {
        LoyaltyTier::Platinum
    } else if visits >= GOLD_MIN_VISITS && spend >= Decimal::from(GOLD_MIN_SPEND) {
        LoyaltyTier::Gold
    } else if visits >= 1 {
        LoyaltyTier::Silver
    } else {
        LoyaltyTier::Regular
    }
}

/// Computes a client's tier from COMPLETED orders only; orders that were
/// partially or fully returned no longer count toward it.
pub async fn dynamic_tier<C: ConnectionTrait>(
    conn: &C,
    client_id: uuid::Uuid,
) -> Result<LoyaltyTier, ServiceError> {
    let orders = Order::find()
        .filter(order::Column::ClientId.eq(client_id))
        .filter(order::Column::Status.eq(OrderStatus::Completed))
        .all(conn)
        .await?;

    let visits = orders.len();
    let spend: Decimal = orders.iter().map(|o| o.total_amount).sum();

    Ok(tier_for(visits, spend))
}

/// The tier promotions see: a manual tier above Regular wins, otherwise the
/// dynamically computed one.
pub async fn effective_tier<C: ConnectionTrait>(
    conn: &C,
    client: &client::Model,
) -> Result<LoyaltyTier, ServiceError> {
    if client.loyalty_tier != LoyaltyTier::Regular {
        return Ok(client.loyalty_tier);
    }
    dynamic_tier(conn, client.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn thresholds_follow_visit_and_spend_floors() {
        assert_eq!(tier_for(0, Decimal::ZERO), LoyaltyTier::Regular);
        assert_eq!(tier_for(1, dec!(50)), LoyaltyTier::Silver);
        assert_eq!(tier_for(6, dec!(1000)), LoyaltyTier::Gold);
        assert_eq!(tier_for(12, dec!(5000)), LoyaltyTier::Platinum);
    }

    #[test]
    fn both_floors_must_be_met() {
        // Plenty of visits, not enough spend.
        assert_eq!(tier_for(20, dec!(900)), LoyaltyTier::Silver);
        // Plenty of spend, not enough visits.
        assert_eq!(tier_for(5, dec!(100000)), LoyaltyTier::Silver);
        // Gold spend with platinum visits stays gold.
        assert_eq!(tier_for(12, dec!(4999.99)), LoyaltyTier::Gold);
    }
}
