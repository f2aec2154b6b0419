pub mod client;
pub mod location;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_variant;
pub mod promotion;
pub mod promotion_product;
pub mod promotion_usage;
pub mod return_entity;
pub mod return_item;
pub mod staff;

// Re-export entities
pub use client::{Entity as Client, LoyaltyTier, Model as ClientModel};
pub use location::{Entity as Location, Model as LocationModel};
pub use order::{Entity as Order, Model as OrderModel, OrderStatus, OrderType};
pub use order_item::{Entity as OrderItem, Model as OrderItemModel};
pub use product::{Entity as Product, Model as ProductModel};
pub use product_variant::{Entity as ProductVariant, Model as ProductVariantModel};
pub use promotion::{
    Entity as Promotion, Model as PromotionModel, PromotionScope, PromotionType, TierRestriction,
};
pub use promotion_product::{Entity as PromotionProduct, Model as PromotionProductModel};
pub use promotion_usage::{Entity as PromotionUsage, Model as PromotionUsageModel};
pub use return_entity::{Entity as Return, Model as ReturnModel, ReturnAction, ReturnReason};
pub use return_item::{Entity as ReturnItem, Model as ReturnItemModel};
pub use staff::{Entity as Staff, Model as StaffModel, StaffRole};
