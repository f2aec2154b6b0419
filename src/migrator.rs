use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_catalog_tables::Migration),
            Box::new(m20250601_000002_create_staff_clients_tables::Migration),
            Box::new(m20250601_000003_create_orders_tables::Migration),
            Box::new(m20250601_000004_create_returns_tables::Migration),
            Box::new(m20250601_000005_create_promotions_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20250601_000001_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Brand).string().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Category).string().not_null())
                        .col(
                            ColumnDef::new(Products::BaseSku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Products::IsArchived)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductVariants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductVariants::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductVariants::ProductId).uuid().not_null())
                        .col(
                            ColumnDef::new(ProductVariants::Sku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(ProductVariants::Color).string().not_null())
                        .col(ColumnDef::new(ProductVariants::Size).string().not_null())
                        .col(
                            ColumnDef::new(ProductVariants::CostPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::RetailPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::Currency)
                                .string()
                                .not_null()
                                .default("USD"),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::OnHand)
                                .integer()
                                .not_null()
                                .default(0)
                                .check(Expr::col(ProductVariants::OnHand).gte(0)),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::MinimumStockLevel)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductVariants::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_variants_product")
                                .from(ProductVariants::Table, ProductVariants::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Locations::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Locations::Name).string().not_null())
                        .col(
                            ColumnDef::new(Locations::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Locations::Address).string().not_null())
                        .col(
                            ColumnDef::new(Locations::IsStore)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Locations::IsWarehouse)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductVariants::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Products {
        Table,
        Id,
        Brand,
        Name,
        Category,
        BaseSku,
        IsArchived,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum ProductVariants {
        Table,
        Id,
        ProductId,
        Sku,
        Color,
        Size,
        CostPrice,
        RetailPrice,
        Currency,
        OnHand,
        MinimumStockLevel,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum Locations {
        Table,
        Id,
        Name,
        Code,
        Address,
        IsStore,
        IsWarehouse,
    }
}

mod m20250601_000002_create_staff_clients_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000002_create_staff_clients_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Staff::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Staff::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Staff::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Staff::Role)
                                .string_len(20)
                                .not_null()
                                .default("SALES_ASSOCIATE"),
                        )
                        .col(
                            ColumnDef::new(Staff::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Clients::FirstName).string().not_null())
                        .col(
                            ColumnDef::new(Clients::LastName)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Clients::Phone)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(
                            ColumnDef::new(Clients::LoyaltyTier)
                                .string_len(20)
                                .not_null()
                                .default("REGULAR"),
                        )
                        .col(
                            ColumnDef::new(Clients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Staff::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Staff {
        Table,
        Id,
        Username,
        Role,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub enum Clients {
        Table,
        Id,
        FirstName,
        LastName,
        Phone,
        Email,
        LoyaltyTier,
        CreatedAt,
    }
}

mod m20250601_000003_create_orders_tables {
    use sea_orm_migration::prelude::*;

    use super::m20250601_000001_create_catalog_tables::{Locations, ProductVariants};
    use super::m20250601_000002_create_staff_clients_tables::{Clients, Staff};

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000003_create_orders_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderCode)
                                .string_len(12)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Orders::OrderType)
                                .string_len(20)
                                .not_null()
                                .default("SALE"),
                        )
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string_len(25)
                                .not_null()
                                .default("DRAFT"),
                        )
                        .col(ColumnDef::new(Orders::ClientId).uuid().null())
                        .col(ColumnDef::new(Orders::LocationId).uuid().not_null())
                        .col(ColumnDef::new(Orders::CreatedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(Orders::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::TotalDiscount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::ParentOrderId).uuid().null())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_client")
                                .from(Orders::Table, Orders::ClientId)
                                .to(Clients::Table, Clients::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_location")
                                .from(Orders::Table, Orders::LocationId)
                                .to(Locations::Table, Locations::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_staff")
                                .from(Orders::Table, Orders::CreatedBy)
                                .to(Staff::Table, Staff::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_parent")
                                .from(Orders::Table, Orders::ParentOrderId)
                                .to(Orders::Table, Orders::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_type_status")
                        .table(Orders::Table)
                        .col(Orders::OrderType)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(OrderItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::VariantId).uuid().not_null())
                        .col(
                            ColumnDef::new(OrderItems::Quantity)
                                .integer()
                                .not_null()
                                .check(Expr::col(OrderItems::Quantity).gt(0)),
                        )
                        .col(
                            ColumnDef::new(OrderItems::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderItems::LineDiscount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::QtyReturned)
                                .integer()
                                .not_null()
                                .default(0)
                                .check(
                                    Expr::col(OrderItems::QtyReturned)
                                        .lte(Expr::col(OrderItems::Quantity)),
                                ),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_order")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_variant")
                                .from(OrderItems::Table, OrderItems::VariantId)
                                .to(ProductVariants::Table, ProductVariants::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_order_items_order")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Orders {
        Table,
        Id,
        OrderCode,
        OrderType,
        Status,
        ClientId,
        LocationId,
        CreatedBy,
        TotalAmount,
        TotalDiscount,
        ParentOrderId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum OrderItems {
        Table,
        Id,
        OrderId,
        VariantId,
        Quantity,
        UnitPrice,
        LineDiscount,
        QtyReturned,
    }
}

mod m20250601_000004_create_returns_tables {
    use sea_orm_migration::prelude::*;

    use super::m20250601_000002_create_staff_clients_tables::Staff;
    use super::m20250601_000003_create_orders_tables::{OrderItems, Orders};

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000004_create_returns_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Returns::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Returns::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Returns::OriginalOrderId).uuid().not_null())
                        .col(ColumnDef::new(Returns::RefundOrderId).uuid().null())
                        .col(ColumnDef::new(Returns::ReplacementOrderId).uuid().null())
                        .col(
                            ColumnDef::new(Returns::Reason)
                                .string_len(20)
                                .not_null()
                                .default("OTHER"),
                        )
                        .col(
                            ColumnDef::new(Returns::Action)
                                .string_len(20)
                                .not_null()
                                .default("REFUND"),
                        )
                        .col(ColumnDef::new(Returns::CreatedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(Returns::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_returns_original_order")
                                .from(Returns::Table, Returns::OriginalOrderId)
                                .to(Orders::Table, Orders::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_returns_replacement_order")
                                .from(Returns::Table, Returns::ReplacementOrderId)
                                .to(Orders::Table, Orders::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_returns_staff")
                                .from(Returns::Table, Returns::CreatedBy)
                                .to(Staff::Table, Staff::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ReturnItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReturnItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ReturnItems::ReturnId).uuid().not_null())
                        .col(ColumnDef::new(ReturnItems::OrderItemId).uuid().not_null())
                        .col(
                            ColumnDef::new(ReturnItems::Quantity)
                                .integer()
                                .not_null()
                                .check(Expr::col(ReturnItems::Quantity).gt(0)),
                        )
                        .col(ColumnDef::new(ReturnItems::Reason).string_len(20).null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_return_items_return")
                                .from(ReturnItems::Table, ReturnItems::ReturnId)
                                .to(Returns::Table, Returns::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_return_items_order_item")
                                .from(ReturnItems::Table, ReturnItems::OrderItemId)
                                .to(OrderItems::Table, OrderItems::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ReturnItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Returns::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Returns {
        Table,
        Id,
        OriginalOrderId,
        RefundOrderId,
        ReplacementOrderId,
        Reason,
        Action,
        CreatedBy,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub enum ReturnItems {
        Table,
        Id,
        ReturnId,
        OrderItemId,
        Quantity,
        Reason,
    }
}

mod m20250601_000005_create_promotions_tables {
    use sea_orm_migration::prelude::*;

    use super::m20250601_000001_create_catalog_tables::Products;
    use super::m20250601_000002_create_staff_clients_tables::Clients;
    use super::m20250601_000003_create_orders_tables::Orders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000005_create_promotions_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Promotions::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Promotions::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Promotions::Name).string().not_null())
                        .col(
                            ColumnDef::new(Promotions::Code)
                                .string_len(50)
                                .null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Promotions::Description).text().null())
                        .col(
                            ColumnDef::new(Promotions::PromoType)
                                .string_len(20)
                                .not_null()
                                .default("PERCENTAGE"),
                        )
                        .col(
                            ColumnDef::new(Promotions::DiscountValue)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Promotions::BuyQuantity)
                                .integer()
                                .not_null()
                                .default(2),
                        )
                        .col(
                            ColumnDef::new(Promotions::GetQuantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Promotions::SilverDiscount)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(5),
                        )
                        .col(
                            ColumnDef::new(Promotions::GoldDiscount)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(10),
                        )
                        .col(
                            ColumnDef::new(Promotions::PlatinumDiscount)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(15),
                        )
                        .col(
                            ColumnDef::new(Promotions::AppliesTo)
                                .string_len(20)
                                .not_null()
                                .default("ALL"),
                        )
                        .col(ColumnDef::new(Promotions::Category).string().null())
                        .col(ColumnDef::new(Promotions::Brand).string().null())
                        .col(
                            ColumnDef::new(Promotions::CustomerTier)
                                .string_len(20)
                                .not_null()
                                .default("ALL"),
                        )
                        .col(
                            ColumnDef::new(Promotions::MinPurchase)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Promotions::MinItems)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Promotions::StartDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Promotions::EndDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Promotions::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Promotions::MaxUses)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Promotions::UsedCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Promotions::MaxUsesPerCustomer)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Promotions::CreatedBy).uuid().null())
                        .col(
                            ColumnDef::new(Promotions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PromotionProducts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PromotionProducts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PromotionProducts::PromotionId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PromotionProducts::ProductId).uuid().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_promotion_products_promotion")
                                .from(PromotionProducts::Table, PromotionProducts::PromotionId)
                                .to(Promotions::Table, Promotions::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_promotion_products_product")
                                .from(PromotionProducts::Table, PromotionProducts::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_promotion_products_unique")
                        .table(PromotionProducts::Table)
                        .col(PromotionProducts::PromotionId)
                        .col(PromotionProducts::ProductId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PromotionUsages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PromotionUsages::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PromotionUsages::PromotionId).uuid().not_null())
                        .col(ColumnDef::new(PromotionUsages::ClientId).uuid().null())
                        .col(ColumnDef::new(PromotionUsages::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(PromotionUsages::DiscountAmount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PromotionUsages::UsedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_promotion_usages_promotion")
                                .from(PromotionUsages::Table, PromotionUsages::PromotionId)
                                .to(Promotions::Table, Promotions::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_promotion_usages_client")
                                .from(PromotionUsages::Table, PromotionUsages::ClientId)
                                .to(Clients::Table, Clients::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_promotion_usages_order")
                                .from(PromotionUsages::Table, PromotionUsages::OrderId)
                                .to(Orders::Table, Orders::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PromotionUsages::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PromotionProducts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Promotions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Promotions {
        Table,
        Id,
        Name,
        Code,
        Description,
        PromoType,
        DiscountValue,
        BuyQuantity,
        GetQuantity,
        SilverDiscount,
        GoldDiscount,
        PlatinumDiscount,
        AppliesTo,
        Category,
        Brand,
        CustomerTier,
        MinPurchase,
        MinItems,
        StartDate,
        EndDate,
        IsActive,
        MaxUses,
        UsedCount,
        MaxUsesPerCustomer,
        CreatedBy,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub enum PromotionProducts {
        Table,
        Id,
        PromotionId,
        ProductId,
    }

    #[derive(DeriveIden)]
    pub enum PromotionUsages {
        Table,
        Id,
        PromotionId,
        ClientId,
        OrderId,
        DiscountAmount,
        UsedAt,
    }
}
