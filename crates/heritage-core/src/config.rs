use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("HERITAGE_ENV", "development")).map_err(|reason| {
        ConfigError::InvalidEnvVar {
            var: "HERITAGE_ENV".to_string(),
            reason,
        }
    })?;

    let bind_addr = parse_or(&lookup, "HERITAGE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("HERITAGE_LOG_LEVEL", "info");

    let geoserver_base_url = or_default(
        "HERITAGE_GEOSERVER_BASE_URL",
        "http://34.47.71.252/geoserver",
    )
    .trim_end_matches('/')
    .to_string();
    let geoserver_workspace = or_default("HERITAGE_GEOSERVER_WORKSPACE", "sbsj");
    let khs_base_url = or_default("HERITAGE_KHS_BASE_URL", "https://www.khs.go.kr/cha")
        .trim_end_matches('/')
        .to_string();

    let cors_origins = split_list(&or_default(
        "HERITAGE_CORS_ORIGINS",
        "http://localhost:5173,http://127.0.0.1:5173",
    ));

    let search_schema = or_default("HERITAGE_SEARCH_SCHEMA", "public");
    let search_row_limit: i64 = parse_or(&lookup, "HERITAGE_SEARCH_ROW_LIMIT", "200")?;
    if search_row_limit < 1 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HERITAGE_SEARCH_ROW_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let upstream_timeout_secs = parse_or(&lookup, "HERITAGE_UPSTREAM_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("HERITAGE_USER_AGENT", "heritage-gis/0.1");

    let resolver_top_n: usize = parse_or(&lookup, "HERITAGE_RESOLVER_TOP_N", "5")?;
    if resolver_top_n == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HERITAGE_RESOLVER_TOP_N".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let list_page_size = parse_or(&lookup, "HERITAGE_LIST_PAGE_SIZE", "50")?;

    let db_max_connections = parse_or(&lookup, "HERITAGE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_or(&lookup, "HERITAGE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_or(&lookup, "HERITAGE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "HERITAGE_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        geoserver_base_url,
        geoserver_workspace,
        khs_base_url,
        cors_origins,
        search_schema,
        search_row_limit,
        upstream_timeout_secs,
        user_agent,
        resolver_top_n,
        list_page_size,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

fn parse_or<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, String> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(format!(
            "unknown environment '{other}'; expected development, test, or production"
        )),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
