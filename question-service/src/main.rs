use question_service::config::QuestionConfig;
use question_service::services::init_metrics;
use question_service::startup::Application;
use service_core::observability::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = QuestionConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "question-service",
        &config.common.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    init_metrics();

    info!(
        data_dir = %config.storage.data_dir.display(),
        schema_path = %config.storage.schema_path.display(),
        auth_enabled = config.auth.enabled(),
        "Starting question-service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start server: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
