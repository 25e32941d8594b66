use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a product, shared by the catalogue and the stock service.
pub type ProductId = u64;

/// A product as returned by the catalogue.
///
/// Only the id is interpreted. Everything else (title, price, image...) is kept
/// verbatim in `details` and travels with the cart entry unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Product {
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            details: Map::new(),
        }
    }

    /// Attaches one display field, builder style.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// A product held in the cart together with the quantity the user wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    #[serde(flatten)]
    pub details: Map<String, Value>,
    pub amount: u32,
}

impl CartItem {
    /// The cart's `id` and `amount` replace any catalogue fields of the same
    /// name, so the entry serializes with one of each.
    pub fn new(product: Product, amount: u32) -> Self {
        let mut details = product.details;
        details.remove("id");
        details.remove("amount");
        Self {
            id: product.id,
            details,
            amount,
        }
    }
}
