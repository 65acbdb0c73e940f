use crate::config::QuestionConfig;
use crate::handlers;
use crate::middleware::require_api_key;
use crate::AppState;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors_middleware, metrics_middleware, request_id_middleware, CorsPolicy, REQUEST_ID_HEADER,
};
use std::future::IntoFuture;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub const LOOKUP_CORS: CorsPolicy = CorsPolicy::new(
    "GET, POST, OPTIONS",
    "Content-Type, Authorization, X-API-Key, Api-Key",
);

pub const SCHEMA_CORS: CorsPolicy = CorsPolicy::new("GET, OPTIONS", "Content-Type");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/get_question",
            get(handlers::get_question)
                .post(handlers::post_question)
                .fallback(handlers::method_not_allowed)
                .layer(from_fn_with_state(state.clone(), require_api_key))
                .layer(from_fn_with_state(LOOKUP_CORS, cors_middleware)),
        )
        .route(
            "/openapi",
            get(handlers::openapi_schema)
                .fallback(handlers::method_not_allowed)
                .layer(from_fn_with_state(SCHEMA_CORS, cors_middleware)),
        )
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: QuestionConfig) -> Result<Self, AppError> {
        if !config.storage.data_dir.is_dir() {
            tracing::warn!(
                "Data directory {} does not exist; every lookup will return 404",
                config.storage.data_dir.display()
            );
        }
        if !config.auth.enabled() {
            tracing::warn!("API_KEY is not set; /get_question accepts unauthenticated requests");
        }

        let address = config.common.address();
        let state = AppState::new(config);
        let app = build_router(state);

        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
