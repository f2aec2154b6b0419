use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff member performing checkouts and returns.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub role: StaffRole,
    pub created_at: DateTime<Utc>,
}

/// Ordered staff roles. Authorization is a single rank comparison: a role
/// satisfies any requirement at or below its own rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum StaffRole {
    #[sea_orm(string_value = "SALES_ASSOCIATE")]
    SalesAssociate,
    #[sea_orm(string_value = "CASHIER")]
    Cashier,
    #[sea_orm(string_value = "OWNER")]
    Owner,
}

impl StaffRole {
    pub fn rank(self) -> u8 {
        match self {
            StaffRole::SalesAssociate => 0,
            StaffRole::Cashier => 1,
            StaffRole::Owner => 2,
        }
    }

    pub fn satisfies(self, minimum: StaffRole) -> bool {
        self.rank() >= minimum.rank()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
