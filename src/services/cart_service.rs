use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::models::{
    Cart, CartError, CartOperation, CartResult, LineItem, ProductId, UpdateProductAmount,
};
use crate::observability::Metrics;
use crate::repositories::{load_cart, save_cart, DurableStorage, ProductLookup};
use crate::services::NotificationSink;

/// Client-side cart state mirrored to durable storage.
///
/// Mutations take the operation lock for their whole read, lookup, persist
/// and replace sequence, so overlapping calls are applied one after another.
/// The committed cart lives in a watch channel outside that lock: readers
/// always see the last committed snapshot, even while a lookup is pending.
/// Within an operation the snapshot is written first and the committed cart
/// is replaced only once the write succeeded.
///
/// Operations never return errors. Failures are logged and turned into one of
/// the fixed user notifications.
pub struct CartStore {
    lookup: Arc<dyn ProductLookup>,
    notifier: Arc<dyn NotificationSink>,
    storage: Arc<dyn DurableStorage>,
    storage_key: String,
    operation: Mutex<()>,
    cart: watch::Sender<Cart>,
    metrics: Option<Arc<Metrics>>,
}

impl CartStore {
    /// Create a store and rehydrate the cart from the snapshot under `storage_key`.
    ///
    /// A missing, unreadable or unparseable snapshot yields an empty cart.
    pub async fn new(
        lookup: Arc<dyn ProductLookup>,
        notifier: Arc<dyn NotificationSink>,
        storage: Arc<dyn DurableStorage>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let cart = Self::rehydrate(storage.as_ref(), &storage_key).await;

        Self {
            lookup,
            notifier,
            storage,
            storage_key,
            operation: Mutex::new(()),
            cart: watch::Sender::new(cart),
            metrics: None,
        }
    }

    /// Record operation outcomes and cart size in `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.set_cart_size(self.cart.borrow().len());
        self.metrics = Some(metrics);
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Last committed cart; never waits for an operation in flight
    pub fn cart(&self) -> Cart {
        self.cart.borrow().clone()
    }

    #[instrument(skip(storage))]
    async fn rehydrate(storage: &dyn DurableStorage, storage_key: &str) -> Cart {
        match load_cart(storage, storage_key).await {
            Ok(Some(cart)) => {
                info!(line_items = cart.len(), "Cart restored from storage");
                cart
            }
            Ok(None) => {
                info!("No stored cart, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!("Stored cart unusable, starting empty: {}", e);
                Cart::new()
            }
        }
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is looked up and appended with amount 1.
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) with its amount
    /// plus one, including that operation's stock check and messages.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        info!("Adding product to cart");

        let _operation = self.operation.lock().await;
        let cart = self.cart();

        if let Some(current) = cart.get(product_id).map(|item| item.amount) {
            debug!(current, "Product already in cart, incrementing");
            let request = UpdateProductAmount::new(product_id, i64::from(current) + 1);
            self.update_locked(&cart, request).await;
            return;
        }

        let result = self.append_product(&cart, product_id).await;
        self.finish(CartOperation::AddProduct, result);
    }

    /// Remove the line item for a product
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) {
        info!("Removing product from cart");

        let _operation = self.operation.lock().await;
        let cart = self.cart();
        let result = self.remove_locked(&cart, product_id).await;
        self.finish(CartOperation::RemoveProduct, result);
    }

    /// Set the amount of a line item.
    ///
    /// Amounts below 1 are ignored without any notification. The stock check
    /// only rejects when the available stock equals the item's *current*
    /// amount; the requested target itself is never compared with stock, so
    /// an explicit large amount is accepted as long as that equality does not
    /// hold.
    #[instrument(skip(self), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        info!("Updating product amount");

        let _operation = self.operation.lock().await;
        let cart = self.cart();
        self.update_locked(&cart, request).await;
    }

    async fn update_locked(&self, cart: &Cart, request: UpdateProductAmount) {
        if request.amount < 1 {
            debug!("Amount below 1, ignoring");
            return;
        }

        let result = self.apply_amount(cart, request).await;
        self.finish(CartOperation::UpdateProductAmount, result);
    }

    async fn append_product(&self, cart: &Cart, product_id: ProductId) -> CartResult<()> {
        let product = self.lookup.find_product(product_id).await?;

        let mut next = cart.clone();
        next.push_item(LineItem::from_product(product_id, product));

        self.commit(next).await
    }

    async fn remove_locked(&self, cart: &Cart, product_id: ProductId) -> CartResult<()> {
        if !cart.contains(product_id) {
            return Err(CartError::NotInCart { product_id });
        }

        let mut next = cart.clone();
        next.remove_item(product_id);

        self.commit(next).await
    }

    async fn apply_amount(&self, cart: &Cart, request: UpdateProductAmount) -> CartResult<()> {
        let product_id = request.product_id;
        let current = cart
            .get(product_id)
            .map(|item| item.amount)
            .ok_or(CartError::NotInCart { product_id })?;

        let stock = self.lookup.find_stock(product_id).await?;
        if stock.amount == current {
            return Err(CartError::OutOfStock {
                product_id,
                requested: request.amount,
                available: stock.amount,
            });
        }

        let amount = u32::try_from(request.amount).map_err(|_| CartError::InvalidAmount {
            amount: request.amount,
        })?;

        let mut next = cart.clone();
        next.set_amount(product_id, amount);

        self.commit(next).await
    }

    /// Persist `next`, then publish it as the committed cart
    async fn commit(&self, next: Cart) -> CartResult<()> {
        save_cart(self.storage.as_ref(), &self.storage_key, &next).await?;
        self.cart.send_replace(next);
        Ok(())
    }

    /// Operation boundary: log, count and downgrade failures to a notification
    fn finish(&self, operation: CartOperation, result: CartResult<()>) {
        match result {
            Ok(()) => {
                let line_items = self.cart.borrow().len();
                info!(operation = %operation, line_items, "Cart updated");
                if let Some(metrics) = &self.metrics {
                    metrics.record_cart_operation(operation, true);
                    metrics.set_cart_size(line_items);
                }
            }
            Err(e) => {
                let kind = operation.failure_kind(&e);
                warn!(operation = %operation, notification = kind.as_str(), "Cart operation failed: {}", e);
                self.notifier.error(kind.message());
                if let Some(metrics) = &self.metrics {
                    metrics.record_cart_operation(operation, false);
                    metrics.record_notification(kind);
                }
            }
        }
    }
}
