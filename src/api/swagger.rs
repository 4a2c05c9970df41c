use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dr. Spill Signup Service API",
        version = "1.0.0",
        description = "Coming-soon signup collection and admin dashboard.\n\n**Authentication:** admin endpoints require a session token from `POST /admin/login`.\n\nPaths are relative to the configured `ROUTE_PREFIX`."
    ),
    paths(
        // Signups
        crate::api::signups::create_signup,
        crate::api::signups::list_signups,

        // Admin
        crate::api::admin::login,
        crate::api::admin::logout,
        crate::api::admin::verify,
        crate::api::admin::dashboard,
        crate::api::admin::export_csv,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::SignupRecord,
            crate::models::CreateSignupRequest,
            crate::models::CreateSignupResponse,
            crate::models::ListSignupsResponse,
            crate::models::AdminLoginRequest,
            crate::models::AdminLoginResponse,
            crate::models::VerifySessionResponse,
            crate::services::DashboardSummary,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Signups", description = "Public signup form submission and listing."),
        (name = "Admin", description = "Password login, dashboard and CSV export."),
        (name = "Health", description = "Health check and metrics."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Admin session token from /admin/login"))
                        .build()
                ),
            );
        }
    }
}
