use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A return/exchange event against one original order.
///
/// `replacement_order_id` points at the EXCHANGE order generated when the
/// customer took replacement items. `refund_order_id` is reserved for a
/// refund-side order document and stays unset in the current flows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "returns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub original_order_id: Uuid,
    pub refund_order_id: Option<Uuid>,
    pub replacement_order_id: Option<Uuid>,
    pub reason: ReturnReason,
    pub action: ReturnAction,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ReturnReason {
    #[sea_orm(string_value = "CHANGED_MIND")]
    ChangedMind,
    #[sea_orm(string_value = "DEFECTIVE")]
    Defective,
    #[sea_orm(string_value = "WRONG_SIZE")]
    WrongSize,
    #[sea_orm(string_value = "WRONG_ITEM")]
    WrongItem,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ReturnAction {
    #[sea_orm(string_value = "REFUND")]
    Refund,
    #[sea_orm(string_value = "EXCHANGE")]
    Exchange,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::return_item::Entity")]
    Items,
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OriginalOrderId",
        to = "super::order::Column::Id"
    )]
    OriginalOrder,
}

impl Related<super::return_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OriginalOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
