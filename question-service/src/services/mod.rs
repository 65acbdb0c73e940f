pub mod auth;
pub mod dataset;
pub mod metrics;
pub mod resolver;

pub use auth::ApiKeyAuthenticator;
pub use dataset::{sanitize_form_id, DatasetError, DatasetLoader, ParseError};
pub use metrics::{get_metrics, init_metrics};
pub use resolver::{LookupError, QuestionResolver};
