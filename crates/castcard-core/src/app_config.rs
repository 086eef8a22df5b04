use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Absolute origin used when building card, profile, and splash URLs.
    /// Stored without a trailing slash.
    pub public_base_url: String,
    pub neynar_api_key: String,
    pub neynar_base_url: String,
    /// Number of recent casts requested per profile.
    pub cast_window: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Extra font file loaded into the card renderer on top of system fonts.
    pub font_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("public_base_url", &self.public_base_url)
            .field("neynar_api_key", &"[redacted]")
            .field("neynar_base_url", &self.neynar_base_url)
            .field("cast_window", &self.cast_window)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("font_path", &self.font_path)
            .finish()
    }
}
