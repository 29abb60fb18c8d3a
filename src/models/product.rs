use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier as used by the catalog API
pub type ProductId = u64;

/// Product details returned by the lookup service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
}

/// Available quantity for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub amount: u32,
}

/// Request model for setting the quantity of a line item.
///
/// The amount is signed so that zero and negative requests from the UI
/// (a decrement button pressed at 1) can be represented and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}
