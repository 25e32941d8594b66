use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{CartItem, Product, ProductId};

/// An immutable snapshot of the cart.
///
/// Entries are unique by product id and keep insertion order. Every change
/// builds a new snapshot, so two snapshots are "the same cart" exactly when
/// [`Cart::same_snapshot`] says so; that identity drives persistence.
#[derive(Debug, Clone)]
pub struct Cart {
    items: Arc<[CartItem]>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from stored entries, dropping duplicate ids and zero
    /// amounts so the snapshot always satisfies the cart invariants.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut unique: Vec<CartItem> = Vec::with_capacity(items.len());
        for item in items {
            if item.amount == 0 || unique.iter().any(|existing| existing.id == item.id) {
                continue;
            }
            unique.push(item);
        }
        Self {
            items: unique.into(),
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// True when both values point at the very same snapshot.
    pub fn same_snapshot(&self, other: &Cart) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// New snapshot with `product` appended at the end with the given amount.
    ///
    /// If the product is already present the snapshot is rebuilt unchanged.
    pub fn with_product(&self, product: Product, amount: u32) -> Cart {
        if self.contains(product.id) || amount == 0 {
            return self.rebuilt(|_| {});
        }
        let mut items = self.items.to_vec();
        items.push(CartItem::new(product, amount));
        Cart {
            items: items.into(),
        }
    }

    /// New snapshot without the entry for `id`.
    pub fn without(&self, id: ProductId) -> Cart {
        let items: Vec<CartItem> = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        Cart {
            items: items.into(),
        }
    }

    /// New snapshot where the entry for `id` holds exactly `amount`.
    ///
    /// An amount of zero removes the entry.
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Cart {
        if amount == 0 {
            return self.without(id);
        }
        self.rebuilt(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.id == id) {
                item.amount = amount;
            }
        })
    }

    fn rebuilt(&self, edit: impl FnOnce(&mut Vec<CartItem>)) -> Cart {
        let mut items = self.items.to_vec();
        edit(&mut items);
        Cart {
            items: items.into(),
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }
}

impl PartialEq for Cart {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartItem>::deserialize(deserializer).map(Cart::from_items)
    }
}
