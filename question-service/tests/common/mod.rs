#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use question_service::config::{AuthConfig, ObservabilityConfig, QuestionConfig, StorageConfig};
use question_service::startup::build_router;
use question_service::AppState;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::path::{Path, PathBuf};
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_API_KEY: &str = "test-api-key";

pub const DEFAULT_DATASET: &str = "question_id,text\n1,Age?\n2,Name?\n";

/// A router backed by a throwaway data directory under the system temp dir.
pub struct TestApp {
    pub root: PathBuf,
    pub config: QuestionConfig,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }
}

pub fn test_config(root: &Path, api_key: Option<&str>) -> QuestionConfig {
    QuestionConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port for testing
            log_level: "error".to_string(),
        },
        auth: AuthConfig {
            api_key: api_key.map(|key| Secret::new(key.to_string())),
        },
        storage: StorageConfig {
            data_dir: root.join("data"),
            schema_path: Path::new(env!("CARGO_MANIFEST_DIR")).join("openapi.json"),
        },
        observability: ObservabilityConfig {
            otlp_endpoint: None,
        },
    }
}

impl TestApp {
    pub fn new(api_key: Option<&str>) -> Self {
        let root = std::env::temp_dir().join(format!("question_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(root.join("data")).expect("Failed to create data dir");

        let config = test_config(&root, api_key);
        let router = build_router(AppState::new(config.clone()));

        TestApp {
            root,
            config,
            router,
        }
    }

    /// App with the two-row default dataset and authentication disabled.
    pub fn with_default_dataset() -> Self {
        let app = Self::new(None);
        app.write_dataset("questions", DEFAULT_DATASET);
        app
    }

    pub fn write_dataset(&self, form_id: &str, contents: &str) {
        std::fs::write(
            self.config.storage.data_dir.join(format!("{}.csv", form_id)),
            contents,
        )
        .expect("Failed to write dataset");
    }

    pub fn with_schema_path(mut self, path: PathBuf) -> Self {
        self.config.storage.schema_path = path;
        self.router = build_router(AppState::new(self.config.clone()));
        self
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
