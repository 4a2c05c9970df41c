use super::{prefix_upper_bound, KvStore};
use crate::utils::error::AppError;
use async_trait::async_trait;
use futures::stream::{Stream, TryStreamExt};
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const COLLECTION: &str = "kv_store";

/// Document layout of the `kv_store` collection
#[derive(Debug, Serialize, Deserialize)]
struct KvEntry {
    key: String,
    value: Value,
}

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn new(uri: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = database_name(uri);
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;
        log::info!("✅ MongoDB connected: database {}", db_name);

        let store = Self { db };
        store.ensure_indexes().await?;

        Ok(store)
    }

    /// Unique index on `key`; `set` relies on it for upserts.
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        let key_index = IndexModel::builder()
            .keys(doc! { "key": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.collection::<Document>().create_index(key_index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(key)", COLLECTION),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        Ok(())
    }

    fn collection<T: Send + Sync>(&self) -> Collection<T> {
        self.db.collection(COLLECTION)
    }
}

/// Last path segment of the URI, without query string. Falls back to `drspill`.
fn database_name(uri: &str) -> String {
    uri.rsplit('/')
        .next()
        .and_then(|s| s.split('?').next())
        .filter(|s| !s.is_empty() && !s.contains(':') && !s.contains('@'))
        .unwrap_or("drspill")
        .to_string()
}

/// Drains a cursor into the values whose key starts with `prefix`.
/// The first cursor error aborts the scan.
async fn collect_prefixed<S, E>(mut entries: S, prefix: &str) -> Result<Vec<Value>, AppError>
where
    S: Stream<Item = Result<KvEntry, E>> + Unpin,
    E: Into<AppError>,
{
    let mut values = Vec::new();
    while let Some(entry) = entries.try_next().await.map_err(Into::<AppError>::into)? {
        if entry.key.starts_with(prefix) {
            values.push(entry.value);
        }
    }
    Ok(values)
}

#[async_trait]
impl KvStore for MongoStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        let entry = KvEntry {
            key: key.to_string(),
            value,
        };

        self.collection::<KvEntry>()
            .replace_one(doc! { "key": key }, entry)
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<Value>, AppError> {
        let filter = match prefix_upper_bound(prefix) {
            Some(upper) => doc! { "key": { "$gte": prefix, "$lt": upper } },
            None => doc! {},
        };

        let cursor = self
            .collection::<KvEntry>()
            .find(filter)
            .sort(doc! { "key": 1 })
            .await?;

        collect_prefixed(cursor, prefix).await
    }

    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_database_name_from_uri() {
        assert_eq!(database_name("mongodb://localhost:27017/signups"), "signups");
        assert_eq!(database_name("mongodb://host/signups?retryWrites=true"), "signups");
        assert_eq!(database_name("mongodb://localhost:27017"), "drspill");
        assert_eq!(database_name("mongodb://localhost:27017/"), "drspill");
    }

    fn entry(key: &str, n: i64) -> Result<KvEntry, AppError> {
        Ok(KvEntry { key: key.to_string(), value: json!({"n": n}) })
    }

    #[tokio::test]
    async fn test_collect_prefixed_keeps_matching_keys() {
        let cursor = futures::stream::iter(vec![
            entry("signup:1:a@x.com", 1),
            entry("other:2", 2),
            entry("signup:3:b@x.com", 3),
        ]);
        let values = collect_prefixed(cursor, "signup:").await.unwrap();
        assert_eq!(values, vec![json!({"n": 1}), json!({"n": 3})]);
    }

    #[tokio::test]
    async fn test_cursor_error_fails_the_scan() {
        let cursor = futures::stream::iter(vec![
            entry("signup:1:a@x.com", 1),
            Err(AppError::Storage("connection reset".to_string())),
            entry("signup:3:b@x.com", 3),
        ]);
        let result = collect_prefixed(cursor, "signup:").await;
        assert!(matches!(result, Err(AppError::Storage(ref msg)) if msg == "connection reset"));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_prefix_scan() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/signup_service_test".to_string());

        let store = MongoStore::new(&uri).await.unwrap();
        let key = format!("test:{}", uuid::Uuid::new_v4());
        store.set(&key, json!({"n": 1})).await.unwrap();
        store.set(&key, json!({"n": 2})).await.unwrap();

        let values = store.get_by_prefix(&key).await.unwrap();
        assert_eq!(values, vec![json!({"n": 2})]);
    }
}
