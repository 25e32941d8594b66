use serde::{Deserialize, Serialize};

use super::ProductId;

/// Stock level reported by the remote service for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

/// Which way a cart change moves the remote stock.
///
/// Only the mirror reads this; the local cart is always overwritten with the
/// literal amount given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAction {
    Add,
    Remove,
}

impl StockAction {
    /// The stock level to report after one unit moved in this direction.
    pub fn apply(self, stock: u32) -> u32 {
        match self {
            Self::Add => stock.saturating_sub(1),
            Self::Remove => stock.saturating_add(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl std::fmt::Display for StockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(format!("unsupported stock action `{other}` (expected add|remove)")),
        }
    }
}

/// Payload for [`crate::clients::CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: u32,
    pub action: StockAction,
}
