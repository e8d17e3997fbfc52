pub mod app_config;
pub mod config;
pub mod relationships;
pub mod types;
pub mod username;

pub use app_config::{AppConfig, Credentials, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use relationships::{dedupe_by_username, not_following_back, FollowMetrics};
pub use types::{
    AnalysisResult, AnalysisSummary, DataSource, ExternalLinks, ProfileSnapshot,
    RelationshipEntry,
};
pub use username::{normalize_username, Username, UsernameError, MAX_USERNAME_LEN};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
