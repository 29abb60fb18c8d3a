// Re-export all model types
pub use self::cart::*;
pub use self::errors::*;
pub use self::notifications::*;
pub use self::product::*;

mod cart;
mod errors;
mod notifications;
mod product;
