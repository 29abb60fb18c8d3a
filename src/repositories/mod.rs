// Repositories module - data access layer

pub mod cart_storage;
pub mod product_repository;

pub use cart_storage::{load_cart, save_cart, DurableStorage, FileStorage, MemoryStorage};
pub use product_repository::{HttpProductLookup, ProductLookup};
