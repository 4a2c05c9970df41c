mod api;
mod config;
mod middleware;
mod models;
mod services;
mod store;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::services::AdminAuth;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Signup Service...");

    let store = store::open(&config.store).await.map_err(|e| {
        log::error!("❌ Failed to open store: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let store_data = web::Data::from(store);
    let auth_data = web::Data::new(AdminAuth::from_config(&config));

    let prefix = config.route_prefix.clone();
    let cors_max_age = config.cors_max_age;
    let address = config.bind_address();

    log::info!("🌐 Server starting on {}", address);
    log::info!("📮 Signup routes mounted at '{}/'", prefix);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", address);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_LENGTH])
            .max_age(cors_max_age);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(auth_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Health, signup and admin endpoints
            .service(web::scope(&prefix).configure(api::configure))
    })
    .bind(address)?
    .run()
    .await
}
