use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Upper bound Neynar accepts for the user-casts `limit` parameter.
const MAX_CAST_WINDOW: u32 = 150;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let neynar_api_key = require("NEYNAR_API_KEY")?;

    let env = parse_environment(&or_default("CASTCARD_ENV", "development"))?;
    let bind_addr = parse_addr("CASTCARD_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CASTCARD_LOG_LEVEL", "info");

    let public_base_url = or_default("CASTCARD_PUBLIC_BASE_URL", "https://activity-tracker.online");
    if !public_base_url.starts_with("http://") && !public_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "CASTCARD_PUBLIC_BASE_URL".to_string(),
            reason: format!("expected an absolute http(s) URL, got '{public_base_url}'"),
        });
    }
    let public_base_url = public_base_url.trim_end_matches('/').to_string();

    let neynar_base_url = or_default("NEYNAR_BASE_URL", "https://api.neynar.com/");
    let cast_window = parse_u32("CASTCARD_CAST_WINDOW", "25")?.clamp(1, MAX_CAST_WINDOW);
    let request_timeout_secs = parse_u64("CASTCARD_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("CASTCARD_USER_AGENT", "castcard/0.1 (activity-tracker)");
    let font_path = lookup("CASTCARD_FONT_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        public_base_url,
        neynar_api_key,
        neynar_base_url,
        cast_window,
        request_timeout_secs,
        user_agent,
        font_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CASTCARD_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
