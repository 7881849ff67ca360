use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_CATALOG_URL: &str = "http://localhost:8000";

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
///
/// Outside development the catalog URL must be given explicitly; the
/// localhost default only makes sense next to a locally running service.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("PRICEPULSE_ENV", "development"));

    let bind_addr = or_default("PRICEPULSE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PRICEPULSE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PRICEPULSE_LOG_LEVEL", "info");

    let catalog_url = match lookup("PRICEPULSE_CATALOG_URL") {
        Ok(url) => url,
        Err(_) if env == Environment::Development => DEFAULT_CATALOG_URL.to_string(),
        Err(_) => {
            return Err(ConfigError::MissingEnvVar(
                "PRICEPULSE_CATALOG_URL".to_string(),
            ))
        }
    };
    if !(catalog_url.starts_with("http://") || catalog_url.starts_with("https://")) {
        return Err(invalid(
            "PRICEPULSE_CATALOG_URL",
            format!("'{catalog_url}' must start with http:// or https://"),
        ));
    }

    let catalog_timeout_secs = parse_u64("PRICEPULSE_CATALOG_TIMEOUT_SECS", "15")?;
    let catalog_max_retries = parse_u32("PRICEPULSE_CATALOG_MAX_RETRIES", "2")?;
    let catalog_retry_backoff_base_ms =
        parse_u64("PRICEPULSE_CATALOG_RETRY_BACKOFF_BASE_MS", "250")?;
    let user_agent = or_default("PRICEPULSE_USER_AGENT", "pricepulse-web/0.1");
    let session_idle_secs = parse_u64("PRICEPULSE_SESSION_IDLE_SECS", "3600")?;
    let stores_path = PathBuf::from(or_default("PRICEPULSE_STORES_PATH", "./config/stores.yaml"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_url,
        catalog_timeout_secs,
        catalog_max_retries,
        catalog_retry_backoff_base_ms,
        user_agent,
        session_idle_secs,
        stores_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
