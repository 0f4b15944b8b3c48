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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let search_base_url = require("LEADGRID_SEARCH_BASE_URL")?;
    let search_api_key = require("LEADGRID_SEARCH_API_KEY")?;

    let env = parse_environment(&or_default("LEADGRID_ENV", "development"));

    let log_level = or_default("LEADGRID_LOG_LEVEL", "info");
    let campaigns_path = PathBuf::from(or_default(
        "LEADGRID_CAMPAIGNS_PATH",
        "./config/campaigns.yaml",
    ));
    let geocoder_base_url = or_default(
        "LEADGRID_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let crawl_base_url = lookup("LEADGRID_CRAWL_BASE_URL").ok();
    let contact_api_base_url = lookup("LEADGRID_CONTACT_API_BASE_URL").ok();
    let contact_api_key = lookup("LEADGRID_CONTACT_API_KEY").ok();

    let http_timeout_secs = parse_u64("LEADGRID_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LEADGRID_USER_AGENT", "leadgrid/0.1 (lead-acquisition)");
    let max_retries = parse_u32("LEADGRID_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("LEADGRID_RETRY_BACKOFF_BASE_SECS", "5")?;

    // Paginated search tokens need a moment to activate server-side; two
    // seconds between pages is the documented safe interval.
    let inter_page_delay_ms = parse_u64("LEADGRID_INTER_PAGE_DELAY_MS", "2000")?;
    let inter_subject_delay_ms = parse_u64("LEADGRID_INTER_SUBJECT_DELAY_MS", "1000")?;
    let monthly_request_ceiling = parse_u32("LEADGRID_MONTHLY_REQUEST_CEILING", "5000")?;

    Ok(AppConfig {
        env,
        log_level,
        campaigns_path,
        geocoder_base_url,
        search_base_url,
        search_api_key,
        crawl_base_url,
        contact_api_base_url,
        contact_api_key,
        http_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_page_delay_ms,
        inter_subject_delay_ms,
        monthly_request_ceiling,
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
