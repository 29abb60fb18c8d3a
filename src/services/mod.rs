// Services module - cart state and user notifications

pub mod cart_service;
pub mod notifier;

pub use cart_service::CartStore;
pub use notifier::{ChannelNotifier, NotificationSink, TracingNotifier};
