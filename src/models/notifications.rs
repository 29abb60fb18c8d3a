use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CartError;

/// Shown when adding a new product fails
pub const ADD_PRODUCT_FAILED: &str = "Erro na adição do produto";
/// Shown when removing a product fails
pub const REMOVE_PRODUCT_FAILED: &str = "Erro na remoção do produto";
/// Shown when changing a quantity fails
pub const UPDATE_AMOUNT_FAILED: &str = "Erro na alteração de quantidade do produto";
/// Shown when the stock has no headroom for one more unit
pub const OUT_OF_STOCK: &str = "Quantidade solicitada fora de estoque";

/// The three cart mutations exposed to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

/// Which fixed message a failed operation produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AddFailed,
    RemoveFailed,
    UpdateFailed,
    OutOfStock,
}

/// An error message queued for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl CartOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::AddProduct => "add_product",
            CartOperation::RemoveProduct => "remove_product",
            CartOperation::UpdateProductAmount => "update_product_amount",
        }
    }

    /// Kind reported when this operation fails with `error`.
    ///
    /// Out-of-stock has its own message whatever the operation; every other
    /// cause collapses into the operation's generic message.
    pub fn failure_kind(&self, error: &CartError) -> NotificationKind {
        if let CartError::OutOfStock { .. } = error {
            return NotificationKind::OutOfStock;
        }
        match self {
            CartOperation::AddProduct => NotificationKind::AddFailed,
            CartOperation::RemoveProduct => NotificationKind::RemoveFailed,
            CartOperation::UpdateProductAmount => NotificationKind::UpdateFailed,
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NotificationKind {
    pub fn message(&self) -> &'static str {
        match self {
            NotificationKind::AddFailed => ADD_PRODUCT_FAILED,
            NotificationKind::RemoveFailed => REMOVE_PRODUCT_FAILED,
            NotificationKind::UpdateFailed => UPDATE_AMOUNT_FAILED,
            NotificationKind::OutOfStock => OUT_OF_STOCK,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AddFailed => "add_failed",
            NotificationKind::RemoveFailed => "remove_failed",
            NotificationKind::UpdateFailed => "update_failed",
            NotificationKind::OutOfStock => "out_of_stock",
        }
    }
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}
