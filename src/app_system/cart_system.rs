use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::cart_actor::spawn_cart_service;
use crate::clients::{CartClient, CartStore, HttpStockApi, StockApi};
use crate::config::CartConfig;
use crate::error::StockApiError;
use crate::notify::{Diagnostics, Notifier, TracingDiagnostics};
use crate::storage::{CartStorage, JsonFileStorage};

/// Starts the cart actor, wires the store to its collaborators and tears
/// everything down again.
pub struct CartSystem {
    pub store: CartStore,
    cart_client: CartClient,
    handle: tokio::task::JoinHandle<()>,
}

impl CartSystem {
    /// Must be called from inside a tokio runtime.
    #[instrument(name = "cart_system", skip_all)]
    pub fn new(
        storage: impl CartStorage,
        stock_api: Arc<dyn StockApi>,
        notifier: Arc<dyn Notifier>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        info!("Starting cart system");

        let (cart_client, handle) = spawn_cart_service(storage, diagnostics.clone());
        let store = CartStore::new(cart_client.clone(), stock_api, notifier, diagnostics);

        info!("Cart system started");
        Self {
            store,
            cart_client,
            handle,
        }
    }

    /// HTTP stock service and JSON file storage as configured; failures are
    /// logged.
    pub fn from_config(
        config: &CartConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, StockApiError> {
        let stock_api = HttpStockApi::new(&config.api)?;
        let storage = JsonFileStorage::new(&config.storage.dir, &config.storage.key);
        Ok(Self::new(
            storage,
            Arc::new(stock_api),
            notifier,
            Arc::new(TracingDiagnostics),
        ))
    }

    /// Waits for outstanding stock mirrors, then stops the cart actor.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down cart system");

        self.store.settle().await;
        let _ = self.cart_client.shutdown().await;

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Cart service shutdown error");
            return Err(format!("Cart service task failed: {e:?}"));
        }

        info!("Cart system shutdown complete");
        Ok(())
    }
}
