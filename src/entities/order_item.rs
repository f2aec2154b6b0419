use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of an order.
///
/// Standing invariant: `0 <= qty_returned <= quantity`. The return engine
/// enforces it with a guarded update on every mutation; the schema carries a
/// matching CHECK constraint.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub variant_id: Uuid,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub line_discount: Decimal,
    pub qty_returned: i32,
}

impl Model {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity) - self.line_discount
    }

    /// Quantity still available for return or exchange.
    pub fn qty_remaining(&self) -> i32 {
        (self.quantity - self.qty_returned).max(0)
    }

    pub fn is_fully_returned(&self) -> bool {
        self.qty_returned >= self.quantity
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product_variant::Entity",
        from = "Column::VariantId",
        to = "super::product_variant::Column::Id"
    )]
    Variant,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: i32, qty_returned: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            variant_id: Uuid::new_v4(),
            quantity,
            unit_price: dec!(100.00),
            line_discount: Decimal::ZERO,
            qty_returned,
        }
    }

    #[test]
    fn line_total_subtracts_line_discount() {
        let mut i = item(3, 0);
        i.line_discount = dec!(50.00);
        assert_eq!(i.line_total(), dec!(250.00));
    }

    #[test]
    fn qty_remaining_never_negative() {
        assert_eq!(item(3, 0).qty_remaining(), 3);
        assert_eq!(item(3, 2).qty_remaining(), 1);
        assert_eq!(item(3, 3).qty_remaining(), 0);
    }

    #[test]
    fn fully_returned_when_all_units_back() {
        assert!(!item(2, 1).is_fully_returned());
        assert!(item(2, 2).is_fully_returned());
    }
}
