use crate::{
    config::{AdminPassword, AppConfig, MAX_PASSWORD_BYTES},
    models::{AdminClaims, AdminLoginResponse},
    utils::error::AppError,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use uuid::Uuid;

const ADMIN_SUBJECT: &str = "admin";
const INCORRECT_PASSWORD: &str = "Incorrect password";

/// Logged-out sessions, by `jti`, kept until their token would have expired anyway.
#[derive(Default)]
pub struct SessionRegistry {
    revoked: RwLock<HashMap<String, usize>>,
}

impl SessionRegistry {
    pub fn revoke(&self, jti: &str, exp: usize) {
        let mut revoked = self.revoked.write().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now().timestamp() as usize;
        revoked.retain(|_, until| *until > now);
        revoked.insert(jti.to_string(), exp);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(jti)
    }
}

/// Admin credential check and session token issuance
pub struct AdminAuth {
    password_hash: Option<String>,
    secret: String,
    issuer: String,
    audience: String,
    session_ttl: Duration,
    sessions: SessionRegistry,
}

impl AdminAuth {
    pub fn new(
        password: AdminPassword,
        secret: String,
        issuer: String,
        audience: String,
        session_ttl: Duration,
    ) -> Self {
        let password_hash = match password {
            AdminPassword::Hash(hash) => Some(hash),
            AdminPassword::Disabled => None,
        };

        Self {
            password_hash,
            secret,
            issuer,
            audience,
            session_ttl,
            sessions: SessionRegistry::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        if matches!(config.admin_password, AdminPassword::Disabled) {
            log::warn!("⚠️  No ADMIN_PASSWORD or ADMIN_PASSWORD_HASH set, admin login is disabled");
        }

        Self::new(
            config.admin_password.clone(),
            config.jwt_secret.clone(),
            config.jwt_issuer.clone(),
            config.jwt_audience.clone(),
            Duration::hours(config.session_hours),
        )
    }

    /// Exchanges the admin password for a session token. Only the exact
    /// configured password is accepted.
    pub async fn login(&self, password: &str) -> Result<AdminLoginResponse, AppError> {
        let hash = self
            .password_hash
            .clone()
            .ok_or_else(|| AppError::Unauthorized(INCORRECT_PASSWORD.to_string()))?;
        // bcrypt would compare only the first 72 bytes
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::Unauthorized(INCORRECT_PASSWORD.to_string()));
        }
        let candidate = password.to_string();

        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash))
            .await
            .map_err(|e| AppError::Storage(format!("Password check task failed: {}", e)))?
            .unwrap_or_else(|e| {
                log::error!("❌ Password verification error: {}", e);
                false
            });

        if !valid {
            return Err(AppError::Unauthorized(INCORRECT_PASSWORD.to_string()));
        }

        let (token, claims) = self.issue_token()?;
        Ok(AdminLoginResponse {
            success: true,
            token,
            expires_at: claims.exp,
        })
    }

    fn issue_token(&self) -> Result<(String, AdminClaims), AppError> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.session_ttl).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: self.audience.clone(),
            iss: self.issuer.clone(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| AppError::Storage(format!("Failed to generate token: {}", e)))?;

        Ok((token, claims))
    }

    /// Decodes a session token and rejects expired, foreign or logged-out ones.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience.clone()]);

        let mut issuers = HashSet::new();
        issuers.insert(self.issuer.clone());
        validation.iss = Some(issuers);

        let claims = decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid session: {}", e)))?;

        if claims.sub != ADMIN_SUBJECT {
            return Err(AppError::Unauthorized("Invalid session".to_string()));
        }
        if self.sessions.is_revoked(&claims.jti) {
            return Err(AppError::Unauthorized("Session has ended".to_string()));
        }

        Ok(claims)
    }

    pub fn logout(&self, claims: &AdminClaims) {
        self.sessions.revoke(&claims.jti, claims.exp);
    }
}
