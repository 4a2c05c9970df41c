use crate::utils::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which backend persists signups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    /// JSON file under `dir`, one file per namespace
    Local { dir: PathBuf },
    MongoDB { url: String },
}

/// Where the admin password comes from. Only the bcrypt hash is kept in memory.
#[derive(Debug, Clone)]
pub enum AdminPassword {
    Disabled,
    Hash(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub route_prefix: String,
    pub store: StoreBackend,
    pub admin_password: AdminPassword,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub session_hours: i64,
    pub cors_max_age: usize,
}

/// bcrypt ignores every byte past this length
pub const MAX_PASSWORD_BYTES: usize = 72;

fn var_or<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str, default: &str) -> String {
    lookup(name).unwrap_or_else(|| default.to_string())
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", name, raw))),
        None => Ok(default),
    }
}

/// Normalizes `ROUTE_PREFIX` to either "" or "/segment" without a trailing slash.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    /// Call `dotenv().ok()` first to pick up a local `.env`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, AppError> {
        let non_empty = |name: &str| lookup(name).filter(|s| !s.is_empty());

        let database_url = non_empty("DATABASE_URL");
        let local_dir = PathBuf::from(var_or(&lookup, "LOCAL_STORE_DIR", "./data"));

        let store = match lookup("STORE_BACKEND").as_deref() {
            Some("memory") => StoreBackend::Memory,
            Some("local") => StoreBackend::Local { dir: local_dir },
            Some("mongodb") => StoreBackend::MongoDB {
                url: database_url.ok_or_else(|| {
                    AppError::Config("STORE_BACKEND=mongodb requires DATABASE_URL".to_string())
                })?,
            },
            Some(other) => {
                return Err(AppError::Config(format!("Unknown STORE_BACKEND: {}", other)))
            }
            None => match database_url {
                Some(url) => StoreBackend::MongoDB { url },
                None => StoreBackend::Local { dir: local_dir },
            },
        };

        let admin_password = match (non_empty("ADMIN_PASSWORD_HASH"), non_empty("ADMIN_PASSWORD")) {
            (Some(hash), _) => AdminPassword::Hash(hash),
            (None, Some(plain)) => {
                if plain.len() > MAX_PASSWORD_BYTES {
                    return Err(AppError::Config(format!(
                        "ADMIN_PASSWORD must be at most {} bytes",
                        MAX_PASSWORD_BYTES
                    )));
                }
                AdminPassword::Hash(
                    bcrypt::hash(&plain, bcrypt::DEFAULT_COST)
                        .map_err(|e| AppError::Config(format!("Failed to hash ADMIN_PASSWORD: {}", e)))?,
                )
            }
            (None, None) => AdminPassword::Disabled,
        };

        let jwt_secret = match non_empty("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                log::warn!("⚠️  JWT_SECRET not set, generating an ephemeral secret (sessions end on restart)");
                uuid::Uuid::new_v4().to_string()
            }
        };

        let session_hours: i64 = parse_var(&lookup, "ADMIN_SESSION_HOURS", 8)?;
        if session_hours <= 0 {
            return Err(AppError::Config("ADMIN_SESSION_HOURS must be positive".to_string()));
        }

        Ok(Self {
            host: var_or(&lookup, "HOST", "0.0.0.0"),
            port: parse_var(&lookup, "PORT", 3002)?,
            route_prefix: normalize_prefix(&var_or(&lookup, "ROUTE_PREFIX", "")),
            store,
            admin_password,
            jwt_secret,
            jwt_issuer: var_or(&lookup, "JWT_ISSUER", "signup-service"),
            jwt_audience: var_or(&lookup, "JWT_AUDIENCE", "signup-admin"),
            session_hours,
            cors_max_age: parse_var(&lookup, "CORS_MAX_AGE", 600)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
