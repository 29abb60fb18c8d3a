use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::models::{Cart, StorageError, StorageResult};

/// Key/value durable storage, shaped like browser local storage
#[async_trait]
pub trait DurableStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the value stored under `key`
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Read and parse the cart snapshot stored under `key`.
///
/// `Ok(None)` means nothing has been stored yet.
pub async fn load_cart(storage: &dyn DurableStorage, key: &str) -> StorageResult<Option<Cart>> {
    let raw = match storage.get_item(key).await? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let cart: Cart = serde_json::from_str(&raw)?;
    if !cart.is_consistent() {
        return Err(StorageError::Unavailable {
            message: format!("snapshot under {} has duplicate ids or zero amounts", key),
        });
    }
    Ok(Some(cart))
}

/// Serialize the whole cart and overwrite the snapshot under `key`
pub async fn save_cart(storage: &dyn DurableStorage, key: &str, cart: &Cart) -> StorageResult<()> {
    let raw = serde_json::to_string(cart)?;
    storage.set_item(key, &raw).await
}

/// File-backed storage: one file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    ///
    /// The key is percent-encoded, so `@RocketShoes:cart` is stored as
    /// `%40RocketShoes%3Acart.json` and distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

#[async_trait]
impl DurableStorage for FileStorage {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                debug!(bytes = raw.len(), "Snapshot read");
                Ok(Some(raw))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot stored");
                Ok(None)
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, value), fields(dir = %self.dir.display(), bytes = value.len()))]
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write then rename so a crash never leaves a half-written snapshot
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        debug!("Snapshot written to {}", path.display());
        Ok(())
    }
}

/// In-process storage, useful for tests and embedding without a filesystem
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one entry
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut items = HashMap::new();
        items.insert(key.into(), value.into());
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl DurableStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
