//! Key-value persistence for signups.
//!
//! The store only knows string keys and opaque JSON values. Callers build keys
//! so that a prefix scan selects the records they need.

pub mod local;
pub mod memory;
pub mod mongo;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::config::StoreBackend;
use crate::utils::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Namespace of the file-backed fallback store
pub const LOCAL_NAMESPACE: &str = "drspill_signups";

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Persists `value` under `key`, replacing whatever was there.
    async fn set(&self, key: &str, value: Value) -> Result<(), AppError>;

    /// All values whose key starts with `prefix`, in ascending key order.
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError>;

    /// Backend name for logs and `/health`
    fn name(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub type SharedStore = Arc<dyn KvStore>;

/// Opens the backend selected in the configuration.
pub async fn open(backend: &StoreBackend) -> Result<SharedStore, AppError> {
    let store: SharedStore = match backend {
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory store, signups are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Local { dir } => {
            Arc::new(LocalStore::open(dir, LOCAL_NAMESPACE).await?)
        }
        StoreBackend::MongoDB { url } => Arc::new(MongoStore::new(url).await?),
    };

    log::info!("✅ Store ready: {}", store.name());
    Ok(store)
}

/// Smallest string greater than every string starting with `prefix`,
/// or `None` when no such bound exists.
pub(crate) fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = char::from_u32(last as u32 + 1) {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}
