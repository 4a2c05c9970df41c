pub mod admin_service;
pub mod dashboard_service;
pub mod signup_service;

pub use admin_service::AdminAuth;
pub use dashboard_service::DashboardSummary;
