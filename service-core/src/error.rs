use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 404 carrying the lookup context that is echoed back to the caller.
    #[error("Not found: {error}")]
    NotFound {
        error: String,
        context: Map<String, Value>,
    },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn not_found(error: impl Into<String>) -> Self {
        AppError::NotFound {
            error: error.into(),
            context: Map::new(),
        }
    }

    /// Attach a field to a `NotFound` body. Other variants are returned unchanged.
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let AppError::NotFound { context, .. } = &mut self {
            context.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            message: Option<String>,
            #[serde(flatten)]
            context: Map<String, Value>,
        }

        let status = self.status();
        let (error, message, context) = match self {
            AppError::BadRequest(msg) => ("Bad Request".to_string(), Some(msg), Map::new()),
            AppError::Unauthorized(msg) => ("Unauthorized".to_string(), Some(msg), Map::new()),
            AppError::NotFound { error, context } => (error, None, context),
            AppError::MethodNotAllowed => ("Method not allowed".to_string(), None, Map::new()),
            AppError::InternalError(err) => {
                tracing::error!(error = %format!("{:#}", err), "Request failed");
                ("Internal server error".to_string(), None, Map::new())
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = %format!("{:#}", err), "Configuration error");
                ("Configuration error".to_string(), None, Map::new())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error,
                message,
                context,
            }),
        )
            .into_response()
    }
}
