pub mod metrics;
pub mod tracing;

pub use self::metrics::{Metrics, MetricsError};
pub use self::tracing::{init_observability, shutdown_observability, ObservabilityError};
