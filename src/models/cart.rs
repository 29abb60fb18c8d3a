use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Product, ProductId};

/// One product-and-quantity entry in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub amount: u32,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
}

/// Ordered list of line items, serialized as a bare JSON array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl LineItem {
    /// Build a fresh line item with amount 1 from looked-up product details
    pub fn from_product(id: ProductId, product: Product) -> Self {
        Self {
            id,
            amount: 1,
            title: product.title,
            price: product.price,
            image: product.image,
        }
    }

    /// price * amount
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the line item for a product
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Append a line item at the end of the cart.
    ///
    /// Returns `false` and leaves the cart untouched when the product is
    /// already present or the amount is zero.
    pub fn push_item(&mut self, item: LineItem) -> bool {
        if item.amount == 0 || self.contains(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the line item for a product, keeping the others in order
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.id != product_id);
        self.items.len() != original_len
    }

    /// Replace the amount of an existing line item.
    ///
    /// Zero is refused so that a stored amount never drops below 1.
    pub fn set_amount(&mut self, product_id: ProductId, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        match self.items.iter_mut().find(|item| item.id == product_id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Sum of all line item amounts
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Sum of all line item subtotals
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// True when ids are unique and every amount is at least 1.
    ///
    /// Snapshots read back from storage are checked with this before use.
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items
            .iter()
            .all(|item| item.amount >= 1 && seen.insert(item.id))
    }
}
