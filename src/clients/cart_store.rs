use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

use crate::clients::{CartClient, StockApi};
use crate::domain::{Cart, ProductId, Stock, StockAction, UpdateProductAmount};
use crate::error::CartError;
use crate::notify::{Diagnostics, Notification, Notifier};

/// The cart as the rest of the application sees it.
///
/// Every operation re-reads live stock before touching the cart, commits a
/// whole new snapshot to the cart actor, and then mirrors the stock change to
/// the remote service in the background. Operations never fail towards the
/// caller: rejections and failures become [`Notification`]s, and the
/// underlying errors go to [`Diagnostics`].
///
/// Two operations racing on the same product may both start from the same
/// snapshot; the later commit wins.
///
/// Mirrors run on the runtime and are owned by the store. Call
/// [`CartStore::settle`] (or `CartSystem::shutdown`) before the last clone is
/// dropped; mirrors still running at that point are aborted.
#[derive(Clone)]
pub struct CartStore {
    cart: CartClient,
    stock_api: Arc<dyn StockApi>,
    notifier: Arc<dyn Notifier>,
    diagnostics: Arc<dyn Diagnostics>,
    mirrors: Arc<Mutex<PendingMirrors>>,
}

impl CartStore {
    pub fn new(
        cart: CartClient,
        stock_api: Arc<dyn StockApi>,
        notifier: Arc<dyn Notifier>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            cart,
            stock_api,
            notifier,
            diagnostics,
            mirrors: Arc::new(Mutex::new(PendingMirrors::default())),
        }
    }

    /// Current cart snapshot.
    pub async fn cart(&self) -> Result<Cart, CartError> {
        self.cart.snapshot().await
    }

    /// Stock the remote service reports for `product_id`.
    ///
    /// `None` when the service could not be asked; callers treat that as
    /// nothing available.
    #[instrument(skip(self))]
    pub async fn query_available_stock(&self, product_id: ProductId) -> Option<u32> {
        debug!("Sending request");
        match self.stock_api.stock(product_id).await {
            Ok(stock) => {
                debug!(available = stock.amount, "Stock checked");
                Some(stock.amount)
            }
            Err(e) => {
                self.diagnostics
                    .report("query_available_stock", &CartError::from(e));
                None
            }
        }
    }

    /// Puts one more unit of `product_id` in the cart.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) {
        info!("Processing add_product request");
        if let Err(e) = self.try_add_product(product_id).await {
            self.diagnostics.report("add_product", &e);
            self.notifier.notify(Notification::AddFailed { product_id });
        }
    }

    /// Drops `product_id` from the cart entirely, whatever its amount.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) {
        info!("Processing remove_product request");
        if let Err(e) = self.try_remove_product(product_id).await {
            self.diagnostics.report("remove_product", &e);
            self.notifier.notify(Notification::RemoveFailed { product_id });
        }
    }

    /// Sets the amount of a product already in the cart to exactly
    /// `update.amount`. The action only picks the direction of the mirror.
    #[instrument(skip(self), fields(product_id = update.product_id, amount = update.amount, action = %update.action))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        info!("Processing update_product_amount request");
        if let Err(e) = self.try_update_product_amount(update).await {
            self.diagnostics.report("update_product_amount", &e);
            self.notifier.notify(Notification::UpdateFailed {
                product_id: update.product_id,
            });
        }
    }

    /// Number of stock mirrors started and not yet awaited by [`CartStore::settle`].
    pub fn pending_mirrors(&self) -> usize {
        self.lock_mirrors().tasks.len()
    }

    /// Waits for every background stock mirror started so far.
    pub async fn settle(&self) {
        let mut pending = std::mem::take(&mut self.lock_mirrors().tasks);
        while let Some(joined) = pending.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Stock mirror task failed");
            }
        }
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let cart = self.cart.snapshot().await?;

        if let Some(item) = cart.find(product_id) {
            let amount = item.amount.saturating_add(1);
            self.update_product_amount(UpdateProductAmount {
                product_id,
                amount,
                action: StockAction::Add,
            })
            .await;
            return Ok(());
        }

        let available = match self.query_available_stock(product_id).await {
            Some(available) if available > 0 => available,
            _ => {
                warn!("Product out of stock");
                self.notifier.notify(Notification::OutOfStock { product_id });
                return Ok(());
            }
        };

        let product = self.stock_api.product(product_id).await?;
        self.cart.commit(cart.with_product(product, 1)).await?;
        info!("Product added to cart");

        self.mirror_stock(product_id, available, StockAction::Add);
        Ok(())
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let cart = self.cart.snapshot().await?;
        let available = self.query_available_stock(product_id).await;

        if !cart.contains(product_id) {
            debug!("Product not in cart");
            return Ok(());
        }

        self.cart.commit(cart.without(product_id)).await?;
        info!("Product removed from cart");

        match available {
            Some(available) => self.mirror_stock(product_id, available, StockAction::Remove),
            None => warn!("Stock unknown, remote stock left as is"),
        }
        Ok(())
    }

    async fn try_update_product_amount(&self, update: UpdateProductAmount) -> Result<(), CartError> {
        let UpdateProductAmount {
            product_id,
            amount,
            action,
        } = update;
        let cart = self.cart.snapshot().await?;
        let available = self.query_available_stock(product_id).await.unwrap_or(0);

        if amount > available {
            warn!(available, "Requested amount exceeds stock");
            self.notifier.notify(Notification::OutOfStock { product_id });
            return Ok(());
        }

        if !cart.contains(product_id) {
            debug!("Product not in cart");
            return Ok(());
        }

        self.cart.commit(cart.with_amount(product_id, amount)).await?;
        info!("Product amount updated");

        self.mirror_stock(product_id, available, action);
        Ok(())
    }

    /// Reports the stock level one unit away from `available` to the remote
    /// service. Best effort: never retried, failures only reach diagnostics.
    fn mirror_stock(&self, product_id: ProductId, available: u32, action: StockAction) {
        let stock = Stock {
            id: product_id,
            amount: action.apply(available),
        };
        let stock_api = self.stock_api.clone();
        let diagnostics = self.diagnostics.clone();
        let span = info_span!("mirror_stock", product_id, amount = stock.amount, %action);

        let mut mirrors = self.lock_mirrors();
        while mirrors.tasks.try_join_next().is_some() {}
        mirrors.tasks.spawn(
            async move {
                match stock_api.set_stock(stock).await {
                    Ok(()) => debug!("Remote stock updated"),
                    Err(e) => diagnostics.report("mirror_stock", &CartError::from(e)),
                }
            }
            .instrument(span),
        );
    }

    fn lock_mirrors(&self) -> MutexGuard<'_, PendingMirrors> {
        self.mirrors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Default)]
struct PendingMirrors {
    tasks: JoinSet<()>,
}

impl Drop for PendingMirrors {
    fn drop(&mut self) {
        while self.tasks.try_join_next().is_some() {}
        if !self.tasks.is_empty() {
            warn!(
                aborted = self.tasks.len(),
                "Store dropped before settle, aborting stock mirrors"
            );
        }
    }
}
