use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;
use tracing::info;

use crate::models::{CartOperation, NotificationKind};

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Metrics collection for the cart store and its lookups
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    // Cart metrics
    pub cart_operations_total: CounterVec,
    pub cart_notifications_total: CounterVec,
    pub cart_line_items: Gauge,

    // Lookup metrics
    pub product_lookups_total: CounterVec,
    pub product_lookup_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Create a new metrics instance with all required metrics registered
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        info!("Initializing Prometheus metrics");

        let cart_operations_total = CounterVec::new(
            Opts::new("cart_operations_total", "Total number of cart operations"),
            &["operation", "status"],
        )?;

        let cart_notifications_total = CounterVec::new(
            Opts::new(
                "cart_notifications_total",
                "Total number of user notifications raised by cart operations",
            ),
            &["kind"],
        )?;

        let cart_line_items = Gauge::new(
            "cart_line_items",
            "Number of line items currently in the cart",
        )?;

        let product_lookups_total = CounterVec::new(
            Opts::new(
                "product_lookups_total",
                "Total number of product and stock lookups",
            ),
            &["endpoint", "status"],
        )?;

        let product_lookup_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "product_lookup_duration_seconds",
                "Product and stock lookup duration in seconds",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["endpoint"],
        )?;

        registry.register(Box::new(cart_operations_total.clone()))?;
        registry.register(Box::new(cart_notifications_total.clone()))?;
        registry.register(Box::new(cart_line_items.clone()))?;
        registry.register(Box::new(product_lookups_total.clone()))?;
        registry.register(Box::new(product_lookup_duration_seconds.clone()))?;

        info!("Prometheus metrics initialized successfully");

        Ok(Metrics {
            registry,
            cart_operations_total,
            cart_notifications_total,
            cart_line_items,
            product_lookups_total,
            product_lookup_duration_seconds,
        })
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    /// Record the outcome of a cart operation
    pub fn record_cart_operation(&self, operation: CartOperation, success: bool) {
        let status = if success { "success" } else { "error" };

        self.cart_operations_total
            .with_label_values(&[operation.as_str(), status])
            .inc();
    }

    pub fn record_notification(&self, kind: NotificationKind) {
        self.cart_notifications_total
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    pub fn set_cart_size(&self, line_items: usize) {
        self.cart_line_items.set(line_items as f64);
    }

    /// Record a product or stock lookup
    pub fn record_lookup(&self, endpoint: &str, success: bool, duration_seconds: f64) {
        let status = if success { "success" } else { "error" };

        self.product_lookups_total
            .with_label_values(&[endpoint, status])
            .inc();

        self.product_lookup_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration_seconds);
    }
}
