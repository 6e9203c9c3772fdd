//! API endpoint modules.

pub mod dashboard;
pub mod fields;
pub mod health;
pub mod history;
pub mod jobs;
pub mod openapi;
pub mod reports;
pub mod websocket;

pub use dashboard::configure_routes as configure_dashboard_routes;
pub use fields::configure_routes as configure_field_routes;
pub use health::configure_health_routes;
pub use history::configure_routes as configure_history_routes;
pub use jobs::configure_routes as configure_job_routes;
pub use openapi::ApiDoc;
pub use reports::configure_routes as configure_report_routes;
pub use websocket::configure_routes as configure_websocket_routes;
