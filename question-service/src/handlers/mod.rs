pub mod health;
pub mod openapi;
pub mod questions;

use service_core::error::AppError;

pub use health::{health_check, metrics};
pub use openapi::openapi_schema;
pub use questions::{get_question, post_question};

/// Fallback for methods a route does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
