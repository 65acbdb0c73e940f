use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::AppState;

pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.authenticator.authenticate(req.headers()) {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            "Rejected request with invalid or missing API key"
        );
        return Err(AppError::Unauthorized(
            "Invalid or missing API key".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
