use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse, ResponseError,
};
use crate::{
    models::{AdminClaims, AdminLoginRequest, AdminLoginResponse, VerifySessionResponse},
    services::{dashboard_service, AdminAuth, DashboardSummary},
    store::KvStore,
    utils::{csv, error::AppError},
};

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Session issued", body = AdminLoginResponse),
        (status = 401, description = "Incorrect password")
    )
)]
pub async fn login(
    auth: web::Data<AdminAuth>,
    request: web::Json<AdminLoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /admin/login");

    match auth.login(&request.password).await {
        Ok(response) => {
            log::info!("✅ Admin session started");
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Admin login failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "Admin",
    responses(
        (status = 200, description = "Session ended"),
        (status = 401, description = "No live session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(auth: web::Data<AdminAuth>, claims: web::ReqData<AdminClaims>) -> HttpResponse {
    auth.logout(&claims);
    log::info!("👋 Admin session {} ended", claims.jti);

    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

#[utoipa::path(
    get,
    path = "/admin/verify",
    tag = "Admin",
    responses(
        (status = 200, description = "Session is live", body = VerifySessionResponse),
        (status = 401, description = "Missing, expired or revoked session")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify(claims: web::ReqData<AdminClaims>) -> HttpResponse {
    HttpResponse::Ok().json(VerifySessionResponse {
        valid: true,
        expires_at: claims.exp,
    })
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "Admin",
    responses(
        (status = 200, description = "Signups newest first, with stats", body = DashboardSummary),
        (status = 401, description = "No live session"),
        (status = 500, description = "Store unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn dashboard(store: web::Data<dyn KvStore>) -> HttpResponse {
    log::info!("📊 GET /admin/dashboard");

    match dashboard_service::load_dashboard(store.get_ref()).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            log::error!("❌ Error loading dashboard: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch signups"
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/admin/signups/export",
    tag = "Admin",
    responses(
        (status = 200, description = "CSV attachment (Name,Email,Date)", content_type = "text/csv"),
        (status = 401, description = "No live session"),
        (status = 404, description = "No signups to export"),
        (status = 500, description = "Store unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export_csv(store: web::Data<dyn KvStore>) -> HttpResponse {
    log::info!("📤 GET /admin/signups/export");

    let summary = match dashboard_service::load_dashboard(store.get_ref()).await {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("❌ Error exporting signups: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch signups"
            }));
        }
    };

    if summary.signups.is_empty() {
        return AppError::NotFound("No signups to export".to_string()).error_response();
    }

    let filename = csv::export_filename(chrono::Utc::now().date_naive());
    log::info!("✅ Exporting {} signups as {}", summary.total, filename);

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(csv::signups_to_csv(&summary.signups))
}
