use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A promotional discount rule.
///
/// Codes are stored upper-cased; lookups normalize the supplied code the
/// same way, so matching is effectively case-insensitive. `max_uses = 0`
/// means unlimited. `used_count` only ever moves up, via a guarded
/// single-statement increment inside the checkout transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub code: Option<String>,
    pub description: Option<String>,
    pub promo_type: PromotionType,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub discount_value: Decimal,
    pub buy_quantity: i32,
    pub get_quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub silver_discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub gold_discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub platinum_discount: Decimal,
    pub applies_to: PromotionScope,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub customer_tier: TierRestriction,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub min_purchase: Decimal,
    pub min_items: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub max_uses: i32,
    pub used_count: i32,
    pub max_uses_per_customer: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PromotionType {
    #[sea_orm(string_value = "PERCENTAGE")]
    Percentage,
    #[sea_orm(string_value = "FIXED")]
    Fixed,
    #[sea_orm(string_value = "BOGO")]
    Bogo,
    #[sea_orm(string_value = "TIERED")]
    Tiered,
    // Reserved; carries no computation of its own yet.
    #[sea_orm(string_value = "BUNDLE")]
    Bundle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PromotionScope {
    #[sea_orm(string_value = "ALL")]
    All,
    #[sea_orm(string_value = "CATEGORY")]
    Category,
    #[sea_orm(string_value = "BRAND")]
    Brand,
    #[sea_orm(string_value = "PRODUCTS")]
    Products,
}

/// Customer-tier gate: a restriction of tier T admits clients whose
/// effective tier ranks at or above T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TierRestriction {
    #[sea_orm(string_value = "ALL")]
    All,
    #[sea_orm(string_value = "SILVER")]
    Silver,
    #[sea_orm(string_value = "GOLD")]
    Gold,
    #[sea_orm(string_value = "PLATINUM")]
    Platinum,
}

impl TierRestriction {
    /// Minimum loyalty rank required, or `None` when open to everyone.
    pub fn min_rank(self) -> Option<u8> {
        match self {
            TierRestriction::All => None,
            TierRestriction::Silver => Some(1),
            TierRestriction::Gold => Some(2),
            TierRestriction::Platinum => Some(3),
        }
    }
}

/// Operator-facing lifecycle label, derived rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PromotionLifecycle {
    Disabled,
    Scheduled,
    Expired,
    Exhausted,
    Active,
}

impl Model {
    /// True when the promotion can be applied right now: activated, inside
    /// its date range, and not usage-exhausted.
    pub fn is_currently_valid(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if now < self.start_date || now > self.end_date {
            return false;
        }
        if self.max_uses > 0 && self.used_count >= self.max_uses {
            return false;
        }
        true
    }

    pub fn lifecycle(&self, now: DateTime<Utc>) -> PromotionLifecycle {
        if !self.is_active {
            PromotionLifecycle::Disabled
        } else if now < self.start_date {
            PromotionLifecycle::Scheduled
        } else if now > self.end_date {
            PromotionLifecycle::Expired
        } else if self.max_uses > 0 && self.used_count >= self.max_uses {
            PromotionLifecycle::Exhausted
        } else {
            PromotionLifecycle::Active
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::promotion_product::Entity")]
    ProductLinks,
    #[sea_orm(has_many = "super::promotion_usage::Entity")]
    Usages,
}

impl Related<super::promotion_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLinks.def()
    }
}

impl Related<super::promotion_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
