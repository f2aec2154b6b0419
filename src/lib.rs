//! Aurelion POS engine
//!
//! Transactional core of a point-of-sale backend for luxury retail: checkout
//! against live inventory, returns and exchanges against prior sales, and a
//! promotion engine selecting the best applicable discount. Presentation,
//! authentication, and export concerns live in collaborating services; this
//! crate owns the data model and the atomicity guarantees around it.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod migrator;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Shared application state wiring the engine's services together.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: Arc<EventSender>,
    pub checkout_service: services::checkout::CheckoutService,
    pub return_service: services::returns::ReturnService,
    pub inventory_service: services::inventory::InventoryService,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: Arc<EventSender>,
    ) -> Self {
        let checkout_service =
            services::checkout::CheckoutService::new(db.clone(), event_sender.clone());
        let return_service =
            services::returns::ReturnService::new(db.clone(), event_sender.clone());
        let inventory_service =
            services::inventory::InventoryService::new(db.clone(), event_sender.clone());

        Self {
            db,
            config,
            event_sender,
            checkout_service,
            return_service,
            inventory_service,
        }
    }

    /// Connects to the configured database, runs migrations when
    /// `auto_migrate` is set, and wires up the event channel. The returned
    /// receiver is typically handed to [`events::process_events`].
    pub async fn bootstrap(
        config: config::AppConfig,
    ) -> Result<(Self, mpsc::Receiver<Event>), ServiceError> {
        let pool = db::establish_connection_from_app_config(&config).await?;
        if config.auto_migrate {
            db::run_migrations(&pool).await?;
        }

        let (event_sender, event_rx) = events::channel(256);
        let state = Self::new(Arc::new(pool), config, Arc::new(event_sender));
        Ok((state, event_rx))
    }
}

/// Initializes the global tracing subscriber from the configured log level
/// and format. Call once at process start.
pub fn init_tracing(config: &config::AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if config.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
