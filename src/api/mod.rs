//! HTTP API module for roster, health, and metrics endpoints.

pub mod handlers;
pub mod response;
pub mod routes;

pub use handlers::AppState;
pub use response::{ApiError, MessageResponse};
pub use routes::create_router;
