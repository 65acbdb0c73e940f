pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use config::QuestionConfig;
use services::{ApiKeyAuthenticator, DatasetLoader, QuestionResolver};

/// Shared application state. Holds configuration only; datasets are read
/// per request.
#[derive(Clone)]
pub struct AppState {
    pub config: QuestionConfig,
    pub authenticator: ApiKeyAuthenticator,
    pub resolver: QuestionResolver,
}

impl AppState {
    pub fn new(config: QuestionConfig) -> Self {
        let authenticator = ApiKeyAuthenticator::new(config.auth.api_key.clone());
        let resolver = QuestionResolver::new(DatasetLoader::new(&config.storage.data_dir));

        Self {
            config,
            authenticator,
            resolver,
        }
    }
}
