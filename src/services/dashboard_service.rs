use crate::{
    models::SignupRecord,
    services::signup_service,
    store::KvStore,
    utils::error::AppError,
};
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DashboardSummary {
    pub success: bool,
    pub total: usize,
    /// Email of the most recent signup
    pub latest_email: Option<String>,
    /// Newest first
    pub signups: Vec<SignupRecord>,
}

/// Sorts by timestamp descending (newest first)
pub fn sort_newest_first(signups: &mut [SignupRecord]) {
    signups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

impl DashboardSummary {
    pub fn from_signups(mut signups: Vec<SignupRecord>) -> Self {
        sort_newest_first(&mut signups);
        Self {
            success: true,
            total: signups.len(),
            latest_email: signups.first().map(|s| s.email.clone()),
            signups,
        }
    }
}

pub async fn load_dashboard(store: &dyn KvStore) -> Result<DashboardSummary, AppError> {
    let signups = signup_service::list_signups(store).await?;
    Ok(DashboardSummary::from_signups(signups))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str, ts: i64) -> SignupRecord {
        SignupRecord {
            name: "n".into(),
            email: email.into(),
            timestamp: ts,
            date: String::new(),
        }
    }

    #[test]
    fn test_summary_is_newest_first() {
        let summary = DashboardSummary::from_signups(vec![
            record("old@x.com", 10),
            record("new@x.com", 30),
            record("mid@x.com", 20),
        ]);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.latest_email.as_deref(), Some("new@x.com"));
        let order: Vec<i64> = summary.signups.iter().map(|s| s.timestamp).collect();
        assert_eq!(order, vec![30, 20, 10]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = DashboardSummary::from_signups(vec![]);
        assert_eq!(summary.total, 0);
        assert!(summary.latest_email.is_none());
    }
}
