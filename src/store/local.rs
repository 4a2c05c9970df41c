use super::memory::scan_prefix;
use super::KvStore;
use crate::utils::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// File-backed fallback store used when no database is configured.
///
/// The whole namespace lives in `<dir>/<namespace>.json` as a single JSON
/// object. Each `set` rewrites the file through a temp file and a rename, so
/// a crash leaves either the old or the new snapshot on disk.
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl LocalStore {
    pub async fn open(dir: &Path, namespace: &str) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}.json", namespace));

        let entries: BTreeMap<String, Value> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Storage(format!("Corrupt store file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        log::info!("📁 Local store at {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for LocalStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        // Held across the write so concurrent sets hit the disk in order
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.to_string(), value);

        if let Err(e) = self.persist(&entries).await {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError> {
        Ok(scan_prefix(&*self.entries.lock().await, prefix))
    }

    fn name(&self) -> &'static str {
        "local"
    }

    async fn health_check(&self) -> Result<(), AppError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        tokio::fs::metadata(dir).await?;
        Ok(())
    }
}
