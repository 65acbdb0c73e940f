use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

use crate::dtos::{LookupBody, LookupParams, LookupRequest};
use crate::services::{metrics::record_lookup, LookupError};
use crate::AppState;

pub async fn get_question(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let request = LookupRequest::try_from(pairs.into_iter().collect::<LookupParams>())?;
    lookup(&state, request).await
}

pub async fn post_question(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let body = LookupBody::parse(&body)?;
    let request = LookupRequest::try_from(body)?;
    lookup(&state, request).await
}

async fn lookup(state: &AppState, request: LookupRequest) -> Result<Response, AppError> {
    let resolver = state.resolver.clone();
    let form_id = request.form_id.clone();
    let question_number = request.question_number.clone();

    let result = tokio::task::spawn_blocking(move || resolver.resolve(&form_id, &question_number))
        .await
        .context("dataset lookup task failed")?;

    match result {
        Ok(record) => {
            record_lookup("found");
            Ok(Json(record).into_response())
        }
        Err(LookupError::Dataset(err)) => {
            record_lookup("error");
            Err(AppError::InternalError(err.into()))
        }
        Err(err) => {
            record_lookup(match err {
                LookupError::FormNotFound => "form_not_found",
                _ => "question_not_found",
            });
            tracing::info!(
                form_id = %request.form_id,
                question_number = %request.question_number,
                "{}",
                err
            );
            Err(AppError::not_found(err.to_string())
                .with_context("form_id", request.form_id)
                .with_context("question_number", request.question_number))
        }
    }
}
