pub mod config;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use config::{Config, ConfigError};
pub use models::{Cart, LineItem, ProductId, UpdateProductAmount};
pub use observability::{init_observability, shutdown_observability, Metrics};
pub use services::CartStore;
