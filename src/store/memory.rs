use super::KvStore;
use crate::utils::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Ordered in-process map. Prefix scans are range queries over the keys.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Values of `entries` whose key starts with `prefix`, in key order.
pub(crate) fn scan_prefix(entries: &BTreeMap<String, Value>, prefix: &str) -> Vec<Value> {
    entries
        .range(prefix.to_string()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(_, value)| value.clone())
        .collect()
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError> {
        Ok(scan_prefix(&*self.entries.read().await, prefix))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
