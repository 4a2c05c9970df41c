use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::store::KvStore;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub store: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn KvStore>) -> HttpResponse {
    let (status, mut response) = match store.health_check().await {
        Ok(()) => ("ok", HttpResponse::Ok()),
        Err(e) => {
            log::warn!("⚠️  Health check: store {} unhealthy: {}", store.name(), e);
            ("degraded", HttpResponse::ServiceUnavailable())
        }
    };

    response.json(HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.name().to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
