use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered customer.
///
/// `loyalty_tier` is a manual override; the effective tier a promotion sees
/// comes from `services::loyalty::effective_tier`, which falls back to the
/// dynamically computed tier when the stored value is `Regular`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub email: Option<String>,
    pub loyalty_tier: LoyaltyTier,
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Receipt label; falls back to the phone number for name-less records.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.phone.clone()
        } else {
            name.to_string()
        }
    }
}

/// Loyalty classification driving tiered promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum LoyaltyTier {
    #[sea_orm(string_value = "REGULAR")]
    Regular,
    #[sea_orm(string_value = "SILVER")]
    Silver,
    #[sea_orm(string_value = "GOLD")]
    Gold,
    #[sea_orm(string_value = "PLATINUM")]
    Platinum,
}

impl LoyaltyTier {
    pub fn rank(self) -> u8 {
        match self {
            LoyaltyTier::Regular => 0,
            LoyaltyTier::Silver => 1,
            LoyaltyTier::Gold => 2,
            LoyaltyTier::Platinum => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    #[sea_orm(has_many = "super::promotion_usage::Entity")]
    PromotionUsages,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::promotion_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PromotionUsages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
