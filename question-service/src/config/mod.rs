use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::{Path, PathBuf};

const SERVICE_DIR: &str = "question-service";

#[derive(Clone, Deserialize)]
pub struct QuestionConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for the lookup endpoint. `None` disables authentication,
    /// which is only meant for local development.
    pub api_key: Option<Secret<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `questions.csv` and the per-form `<form_id>.csv` files.
    pub data_dir: PathBuf,
    /// Static OpenAPI document served at `/openapi`.
    pub schema_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub otlp_endpoint: Option<String>,
}

impl QuestionConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let mut common = core_config::Config::load()?;
        if let Ok(level) = env::var("LOG_LEVEL") {
            common.log_level = level;
        }

        let root = service_root()?;

        Ok(QuestionConfig {
            common,
            auth: AuthConfig {
                api_key: env::var("API_KEY").ok().and_then(non_empty_secret),
            },
            storage: StorageConfig {
                data_dir: root.join(get_env("DATA_DIR", "data")),
                schema_path: root.join(get_env("SCHEMA_PATH", "openapi.json")),
            },
            observability: ObservabilityConfig {
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        })
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AuthConfig {
    pub fn enabled(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }
}

fn non_empty_secret(value: String) -> Option<Secret<String>> {
    if value.is_empty() {
        None
    } else {
        Some(Secret::new(value))
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Relative data and schema paths resolve against the service crate when the
/// process is started from the workspace root, else against the working
/// directory.
fn service_root() -> Result<PathBuf, AppError> {
    let base_path = env::current_dir()?;
    Ok(resolve_service_root(&base_path))
}

fn resolve_service_root(base_path: &Path) -> PathBuf {
    let nested = base_path.join(SERVICE_DIR);
    if !base_path.ends_with(SERVICE_DIR) && nested.is_dir() {
        nested
    } else {
        base_path.to_path_buf()
    }
}
