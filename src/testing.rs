//! In-crate fakes for the cart's collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::app_system::CartSystem;
use crate::clients::StockApi;
use crate::domain::{Cart, Product, ProductId, Stock};
use crate::error::{CartError, StockApiError};
use crate::notify::{Diagnostics, Notification, Notifier};
use crate::storage::MemoryStorage;

fn unavailable(path: String) -> StockApiError {
    StockApiError::Status {
        url: format!("http://fake{path}"),
        status: 503,
    }
}

/// Catalogue and stock kept in memory. Every `set_stock` is recorded and
/// also applied, like the real service would.
#[derive(Default)]
pub struct FakeStockApi {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, u32>>,
    patches: Mutex<Vec<Stock>>,
    fail_stock: AtomicBool,
    fail_product: AtomicBool,
    fail_set_stock: AtomicBool,
}

impl FakeStockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a product titled after its id with `stock` units available.
    pub fn with_product(self, id: ProductId, stock: u32) -> Self {
        let product = Product::new(id)
            .with_detail("title", format!("Product {id}"))
            .with_detail("price", 100 + id);
        self.products.lock().unwrap().insert(id, product);
        self.stock.lock().unwrap().insert(id, stock);
        self
    }

    pub fn failing_stock(self) -> Self {
        self.fail_stock.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_product(self) -> Self {
        self.fail_product.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_set_stock(self) -> Self {
        self.fail_set_stock.store(true, Ordering::SeqCst);
        self
    }

    pub fn stock_of(&self, id: ProductId) -> Option<u32> {
        self.stock.lock().unwrap().get(&id).copied()
    }

    pub fn patches(&self) -> Vec<Stock> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl StockApi for FakeStockApi {
    async fn product(&self, id: ProductId) -> Result<Product, StockApiError> {
        if self.fail_product.load(Ordering::SeqCst) {
            return Err(unavailable(format!("/products/{id}")));
        }
        self.products
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| StockApiError::Status {
                url: format!("http://fake/products/{id}"),
                status: 404,
            })
    }

    async fn stock(&self, id: ProductId) -> Result<Stock, StockApiError> {
        if self.fail_stock.load(Ordering::SeqCst) {
            return Err(unavailable(format!("/stock/{id}")));
        }
        self.stock
            .lock()
            .unwrap()
            .get(&id)
            .map(|&amount| Stock { id, amount })
            .ok_or_else(|| StockApiError::Status {
                url: format!("http://fake/stock/{id}"),
                status: 404,
            })
    }

    async fn set_stock(&self, stock: Stock) -> Result<(), StockApiError> {
        self.patches.lock().unwrap().push(stock);
        if self.fail_set_stock.load(Ordering::SeqCst) {
            return Err(unavailable(format!("/stock/{}", stock.id)));
        }
        self.stock.lock().unwrap().insert(stock.id, stock.amount);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

#[derive(Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingDiagnostics {
    pub fn operations(&self) -> Vec<&'static str> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|(operation, _)| *operation)
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, operation: &'static str, error: &CartError) {
        self.reports
            .lock()
            .unwrap()
            .push((operation, error.to_string()));
    }
}

/// A running cart system wired to fakes.
pub struct Harness {
    pub system: CartSystem,
    pub storage: Arc<MemoryStorage>,
    pub api: Arc<FakeStockApi>,
    pub notifier: Arc<RecordingNotifier>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

impl Harness {
    pub fn start(initial: &Cart, api: FakeStockApi) -> Self {
        let storage = Arc::new(MemoryStorage::with_cart(initial).unwrap());
        let api = Arc::new(api);
        let notifier = Arc::new(RecordingNotifier::default());
        let diagnostics = Arc::new(RecordingDiagnostics::default());

        let system = CartSystem::new(
            storage.clone(),
            api.clone(),
            notifier.clone(),
            diagnostics.clone(),
        );

        Self {
            system,
            storage,
            api,
            notifier,
            diagnostics,
        }
    }

    pub async fn cart(&self) -> Cart {
        self.system.store.cart().await.unwrap()
    }
}

/// Cart entry as the fake catalogue would have produced it.
pub fn cart_with(entries: &[(ProductId, u32)]) -> Cart {
    entries.iter().fold(Cart::new(), |cart, &(id, amount)| {
        cart.with_product(
            Product::new(id)
                .with_detail("title", format!("Product {id}"))
                .with_detail("price", 100 + id),
            amount,
        )
    })
}
