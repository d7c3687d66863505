//! HTTP API for image analysis

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use routes::build_router;
