pub mod admin;
pub mod health;
pub mod metrics;
pub mod signups;
pub mod swagger;

use actix_web::{error::InternalError, web, HttpResponse};

use crate::middleware::AdminSession;

/// Malformed or non-JSON bodies become `400 {"error": ...}`.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {}", err);
        log::warn!("❌ {}", message);
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}

/// Registers the signup and admin routes. Mounted under `ROUTE_PREFIX`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .route("/signup", web::post().to(signups::create_signup))
        .route("/signups", web::get().to(signups::list_signups))
        .service(
            web::scope("/admin")
                .route("/login", web::post().to(admin::login))
                // Session required from here on
                .service(
                    web::resource("/logout")
                        .wrap(AdminSession)
                        .route(web::post().to(admin::logout)),
                )
                .service(
                    web::resource("/verify")
                        .wrap(AdminSession)
                        .route(web::get().to(admin::verify)),
                )
                .service(
                    web::resource("/dashboard")
                        .wrap(AdminSession)
                        .route(web::get().to(admin::dashboard)),
                )
                .service(
                    web::resource("/signups/export")
                        .wrap(AdminSession)
                        .route(web::get().to(admin::export_csv)),
                ),
        );
}
