//! Domain model, engagement aggregation, and configuration shared by every
//! castcard crate.

pub mod app_config;
pub mod config;
pub mod engagement;
pub mod engagers;
pub mod profile;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use engagement::{aggregate, EngagementStats};
pub use engagers::{apply_engager_profiles, rank_top_engagers};
pub use profile::{Cast, EngagerRef, TopEngager, UserProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
