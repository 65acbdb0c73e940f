use anyhow::Context;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde_json::Value;
use service_core::error::AppError;

use crate::AppState;

/// Serve the static OpenAPI document. The file is re-read on every request.
pub async fn openapi_schema(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let path = &state.config.storage.schema_path;

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    let schema: Value = serde_json::from_str(&raw)
        .with_context(|| format!("schema {} is not valid JSON", path.display()))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], Json(schema)))
}
