//! # cart-store
//!
//! Shopping-cart state for a storefront client: which products are in the
//! cart and how many of each, kept across sessions and checked against a
//! remote stock service.
//!
//! ## Pieces
//!
//! - **Domain types** - [`Cart`] snapshots, [`CartItem`], [`Stock`] → [`domain`]
//! - **Cart actor** - owns the snapshot and writes it to storage when it changes → [`cart_actor::CartService`]
//! - **Clients** - [`CartClient`] (actor handle), [`StockApi`] (remote service) and the
//!   orchestrating [`CartStore`] handed to the rest of the application
//! - **Collaborators** - [`storage::CartStorage`], [`notify::Notifier`], [`notify::Diagnostics`]
//! - **System** - [`CartSystem`] wires it all and shuts it down; [`setup_tracing`] configures logs
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use cart_store::{CartConfig, CartSystem, LoadOptions, TracingNotifier};
//!
//! let config = CartConfig::load(LoadOptions::default())?;
//! let system = CartSystem::from_config(&config, Arc::new(TracingNotifier))?;
//!
//! system.store.add_product(1).await;
//! println!("{}", serde_json::to_string(&system.store.cart().await?)?);
//!
//! system.shutdown().await.map_err(anyhow::Error::msg)?;
//! # Ok(())
//! # }
//! ```

pub mod app_system;
pub mod cart_actor;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod messages;
pub mod notify;
pub mod storage;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod testing;

pub use app_system::{setup_tracing, CartSystem};
pub use clients::{CartClient, CartStore, HttpStockApi, StockApi};
pub use config::{CartConfig, LoadOptions};
pub use domain::{Cart, CartItem, Product, ProductId, Stock, StockAction, UpdateProductAmount};
pub use error::{CartError, StockApiError, StorageError};
pub use notify::{ChannelNotifier, Notification, Notifier, TracingDiagnostics, TracingNotifier};
pub use storage::{CartStorage, JsonFileStorage, MemoryStorage};
