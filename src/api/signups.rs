use actix_web::{web, HttpResponse};
use crate::{
    models::{CreateSignupRequest, CreateSignupResponse, ListSignupsResponse},
    services::signup_service,
    store::KvStore,
    utils::error::AppError,
};

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Signups",
    request_body = CreateSignupRequest,
    responses(
        (status = 200, description = "Signup stored", body = CreateSignupResponse),
        (status = 400, description = "Name or email missing"),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn create_signup(
    store: web::Data<dyn KvStore>,
    request: web::Json<CreateSignupRequest>,
) -> HttpResponse {
    log::info!("📝 POST /signup");

    match signup_service::create_signup(store.get_ref(), &request).await {
        Ok(_) => HttpResponse::Ok().json(CreateSignupResponse {
            success: true,
            message: "Successfully signed up!".to_string(),
        }),
        Err(e @ AppError::Validation(_)) => {
            log::warn!("❌ Signup rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.public_message()
            }))
        }
        Err(e) => {
            log::error!("❌ Error during signup: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to process signup"
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/signups",
    tag = "Signups",
    responses(
        (status = 200, description = "All stored signups", body = ListSignupsResponse),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn list_signups(store: web::Data<dyn KvStore>) -> HttpResponse {
    log::info!("📊 GET /signups");

    match signup_service::list_signups(store.get_ref()).await {
        Ok(signups) => HttpResponse::Ok().json(ListSignupsResponse {
            success: true,
            count: signups.len(),
            signups,
        }),
        Err(e) => {
            log::error!("❌ Error fetching signups: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch signups"
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{failing_store, test_app_with};
    use crate::store::MemoryStore;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_signup_then_list() {
        let app = test::init_service(test_app_with(Arc::new(MemoryStore::new()))).await;

        let before = chrono::Utc::now().timestamp_millis();
        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"name": "A", "email": "a@x.com"}))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        let after = chrono::Utc::now().timestamp_millis();

        assert_eq!(resp, json!({"success": true, "message": "Successfully signed up!"}));

        let req = test::TestRequest::get().uri("/signups").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["signups"][0]["name"], "A");
        assert_eq!(body["signups"][0]["email"], "a@x.com");
        let ts = body["signups"][0]["timestamp"].as_i64().unwrap();
        assert!(ts >= before && ts <= after);
    }

    #[actix_web::test]
    async fn test_missing_email_is_rejected() {
        let app = test::init_service(test_app_with(Arc::new(MemoryStore::new()))).await;

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"name": "A"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Name and email are required"}));

        let req = test::TestRequest::get().uri("/signups").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn test_empty_list() {
        let app = test::init_service(test_app_with(Arc::new(MemoryStore::new()))).await;

        let req = test::TestRequest::get().uri("/signups").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"success": true, "count": 0, "signups": []}));
    }

    #[actix_web::test]
    async fn test_malformed_json_is_client_error() {
        let app = test::init_service(test_app_with(Arc::new(MemoryStore::new()))).await;

        let req = test::TestRequest::post()
            .uri("/signup")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_non_string_fields_are_client_errors() {
        let app = test::init_service(test_app_with(Arc::new(MemoryStore::new()))).await;

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"name": "A", "email": 123}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

        let req = test::TestRequest::get().uri("/signups").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 0);
    }

    #[actix_web::test]
    async fn test_store_failures_are_generic_500s() {
        let app = test::init_service(test_app_with(failing_store())).await;

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"name": "A", "email": "a@x.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Failed to process signup"}));

        let req = test::TestRequest::get().uri("/signups").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Failed to fetch signups"}));
    }
}
