#![allow(dead_code)]

use aurelion_pos::{
    config::AppConfig,
    entities::{
        client::{self, LoyaltyTier},
        location,
        product::{self},
        product_variant::{self},
        promotion::{self, PromotionScope, PromotionType, TierRestriction},
        staff::{self, StaffRole},
    },
    events, AppState,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

/// Test harness: in-memory SQLite, migrated schema, wired services.
pub struct TestApp {
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:", "test");
        // A single pooled connection keeps every query on the same
        // in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let (state, event_rx) = AppState::bootstrap(cfg)
            .await
            .expect("failed to bootstrap test application");
        let event_task = tokio::spawn(events::process_events(event_rx));

        Self {
            state,
            _event_task: event_task,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    pub async fn seed_location(&self) -> location::Model {
        location::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Flagship Boutique".into()),
            code: Set(format!("LOC-{}", &Uuid::new_v4().simple().to_string()[..8])),
            address: Set("1 Rue de la Paix".into()),
            is_store: Set(true),
            is_warehouse: Set(false),
        }
        .insert(self.db())
        .await
        .expect("seed location")
    }

    pub async fn seed_staff(&self, role: StaffRole) -> staff::Model {
        staff::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(format!("staff-{}", &Uuid::new_v4().simple().to_string()[..8])),
            role: Set(role),
            created_at: Set(Utc::now()),
        }
        .insert(self.db())
        .await
        .expect("seed staff")
    }

    pub async fn seed_client(&self, tier: LoyaltyTier) -> client::Model {
        client::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set("Amélie".into()),
            last_name: Set("Durand".into()),
            phone: Set(format!("+33-{}", Uuid::new_v4().simple())),
            email: Set(None),
            loyalty_tier: Set(tier),
            created_at: Set(Utc::now()),
        }
        .insert(self.db())
        .await
        .expect("seed client")
    }

    pub async fn seed_product(&self, brand: &str, name: &str, category: &str) -> product::Model {
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            brand: Set(brand.into()),
            name: Set(name.into()),
            category: Set(category.into()),
            base_sku: Set(format!("BASE-{}", &Uuid::new_v4().simple().to_string()[..8])),
            is_archived: Set(false),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db())
        .await
        .expect("seed product")
    }

    pub async fn seed_variant(
        &self,
        product: &product::Model,
        sku: &str,
        retail_price: Decimal,
        on_hand: i32,
    ) -> product_variant::Model {
        product_variant::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            sku: Set(sku.into()),
            color: Set("Black".into()),
            size: Set("M".into()),
            cost_price: Set(retail_price / dec!(2)),
            retail_price: Set(retail_price),
            currency: Set("USD".into()),
            on_hand: Set(on_hand),
            minimum_stock_level: Set(1),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(self.db())
        .await
        .expect("seed variant")
    }

    /// Seeds a product and one variant in one call.
    pub async fn seed_sku(
        &self,
        sku: &str,
        retail_price: Decimal,
        on_hand: i32,
    ) -> product_variant::Model {
        let product = self.seed_product("Gucci", "Marmont Bag", "Bags").await;
        self.seed_variant(&product, sku, retail_price, on_hand).await
    }

    pub async fn insert_promotion(&self, model: promotion::Model) -> promotion::Model {
        promotion::ActiveModel {
            id: Set(model.id),
            name: Set(model.name),
            code: Set(model.code),
            description: Set(model.description),
            promo_type: Set(model.promo_type),
            discount_value: Set(model.discount_value),
            buy_quantity: Set(model.buy_quantity),
            get_quantity: Set(model.get_quantity),
            silver_discount: Set(model.silver_discount),
            gold_discount: Set(model.gold_discount),
            platinum_discount: Set(model.platinum_discount),
            applies_to: Set(model.applies_to),
            category: Set(model.category),
            brand: Set(model.brand),
            customer_tier: Set(model.customer_tier),
            min_purchase: Set(model.min_purchase),
            min_items: Set(model.min_items),
            start_date: Set(model.start_date),
            end_date: Set(model.end_date),
            is_active: Set(model.is_active),
            max_uses: Set(model.max_uses),
            used_count: Set(model.used_count),
            max_uses_per_customer: Set(model.max_uses_per_customer),
            created_by: Set(model.created_by),
            created_at: Set(model.created_at),
        }
        .insert(self.db())
        .await
        .expect("seed promotion")
    }
}

/// A currently-valid ALL-scope promotion template tests tweak before insert.
pub fn base_promotion(name: &str, promo_type: PromotionType) -> promotion::Model {
    let now = Utc::now();
    promotion::Model {
        id: Uuid::new_v4(),
        name: name.into(),
        code: None,
        description: None,
        promo_type,
        discount_value: dec!(10.00),
        buy_quantity: 2,
        get_quantity: 1,
        silver_discount: dec!(5.00),
        gold_discount: dec!(10.00),
        platinum_discount: dec!(15.00),
        applies_to: PromotionScope::All,
        category: None,
        brand: None,
        customer_tier: TierRestriction::All,
        min_purchase: Decimal::ZERO,
        min_items: 0,
        start_date: now - Duration::days(7),
        end_date: now + Duration::days(7),
        is_active: true,
        max_uses: 0,
        used_count: 0,
        max_uses_per_customer: 0,
        created_by: None,
        created_at: now,
    }
}
