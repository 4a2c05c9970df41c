use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Every signup key starts with this prefix.
pub const SIGNUP_PREFIX: &str = "signup:";

/// One landing-page form submission, as persisted in the store
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct SignupRecord {
    pub name: String,
    pub email: String,
    /// Epoch millis
    pub timestamp: i64,
    /// ISO-8601, UTC, millisecond precision
    pub date: String,
}

impl SignupRecord {
    /// Builds a record stamped at `at`. `timestamp` and `date` share the same instant.
    pub fn new(name: String, email: String, at: DateTime<Utc>) -> Self {
        Self {
            name,
            email,
            timestamp: at.timestamp_millis(),
            date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// `signup:<timestamp>:<email>`
    pub fn key(&self) -> String {
        format!("{}{}:{}", SIGNUP_PREFIX, self.timestamp, self.email)
    }
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateSignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreateSignupResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ListSignupsResponse {
    pub success: bool,
    pub count: usize,
    pub signups: Vec<SignupRecord>,
}
