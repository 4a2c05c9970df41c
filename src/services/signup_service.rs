use crate::{
    models::{CreateSignupRequest, SignupRecord, SIGNUP_PREFIX},
    store::KvStore,
    utils::error::AppError,
};
use chrono::Utc;

const MISSING_FIELDS: &str = "Name and email are required";

/// Present means "non-empty string". No trimming, no format check.
fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Validates the request and stores a new record stamped with the current time.
pub async fn create_signup(
    store: &dyn KvStore,
    request: &CreateSignupRequest,
) -> Result<SignupRecord, AppError> {
    let (name, email) = match (required(&request.name), required(&request.email)) {
        (Some(name), Some(email)) => (name, email),
        _ => return Err(AppError::Validation(MISSING_FIELDS.to_string())),
    };

    let record = SignupRecord::new(name.to_string(), email.to_string(), Utc::now());
    let value = serde_json::to_value(&record)?;

    store.set(&record.key(), value).await?;

    log::info!("New signup stored: {} - {}", record.email, record.name);
    Ok(record)
}

/// Every stored signup, in store order. Values that do not decode are skipped.
pub async fn list_signups(store: &dyn KvStore) -> Result<Vec<SignupRecord>, AppError> {
    let values = store.get_by_prefix(SIGNUP_PREFIX).await?;

    let signups = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<SignupRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("⚠️  Skipping malformed signup record: {}", e);
                None
            }
        })
        .collect();

    Ok(signups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn request(name: Option<&str>, email: Option<&str>) -> CreateSignupRequest {
        CreateSignupRequest {
            name: name.map(String::from),
            email: email.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_signup_is_listed_with_timestamp_in_window() {
        let store = MemoryStore::new();
        let before = Utc::now().timestamp_millis();
        create_signup(&store, &request(Some("A"), Some("a@x.com"))).await.unwrap();
        let after = Utc::now().timestamp_millis();

        let signups = list_signups(&store).await.unwrap();
        assert_eq!(signups.len(), 1);
        assert_eq!(signups[0].name, "A");
        assert_eq!(signups[0].email, "a@x.com");
        assert!(signups[0].timestamp >= before && signups[0].timestamp <= after);
    }

    #[tokio::test]
    async fn test_missing_or_empty_fields_store_nothing() {
        let store = MemoryStore::new();

        for req in [
            request(Some("A"), None),
            request(None, Some("a@x.com")),
            request(Some(""), Some("a@x.com")),
            request(Some("A"), Some("")),
        ] {
            let err = create_signup(&store, &req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref msg) if msg == MISSING_FIELDS));
        }

        assert!(list_signups(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_email_twice_is_not_deduplicated() {
        let store = MemoryStore::new();
        create_signup(&store, &request(Some("A"), Some("a@x.com"))).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        create_signup(&store, &request(Some("A again"), Some("a@x.com"))).await.unwrap();

        let signups = list_signups(&store).await.unwrap();
        assert_eq!(signups.len(), 2);
        assert!(signups[0].timestamp < signups[1].timestamp);
    }

    #[tokio::test]
    async fn test_malformed_values_are_skipped() {
        let store = MemoryStore::new();
        store.set("signup:1:junk", json!({"unexpected": true})).await.unwrap();
        create_signup(&store, &request(Some("A"), Some("a@x.com"))).await.unwrap();

        let signups = list_signups(&store).await.unwrap();
        assert_eq!(signups.len(), 1);
        assert_eq!(signups[0].email, "a@x.com");
    }
}
