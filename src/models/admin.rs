use serde::{Deserialize, Serialize};

// JWT Claims for an admin session
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    pub sub: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // session id, used for logout
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VerifySessionResponse {
    pub valid: bool,
    pub expires_at: usize,
}
