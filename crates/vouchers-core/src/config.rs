use std::collections::BTreeSet;

use crate::app_config::{AppConfig, Pacing, Schedule};
use crate::filter::{FilterConfig, DEFAULT_CODE_BLACKLIST};
use crate::ConfigError;

/// Browser-like `User-Agent` the source site serves full pages to.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_flag = |var: &str| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(false),
            Ok(raw) => parse_bool(&raw).ok_or_else(|| {
                invalid(var, format!("expected true/false, got \"{raw}\""))
            }),
        }
    };

    let log_level = or_default("VOUCHERS_LOG_LEVEL", "info");
    let verbose = parse_flag("VOUCHERS_VERBOSE")?;
    let cache_dir = PathBuf::from(or_default("VOUCHERS_CACHE_DIR", "Voucher_JSONs"));
    let site_prefix = or_default("VOUCHERS_SITE_PREFIX", "blick");
    let site_origin = or_default("VOUCHERS_SITE_ORIGIN", "https://gutscheine.blick.ch");
    let overview_url = or_default(
        "VOUCHERS_OVERVIEW_URL",
        "https://gutscheine.blick.ch/alle-shops",
    );
    let max_voucher_age_secs = parse_u64("VOUCHERS_MAX_VOUCHER_AGE_SECS", "43200")?;
    let request_timeout_secs = parse_u64("VOUCHERS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("VOUCHERS_USER_AGENT", DEFAULT_USER_AGENT);

    let schedule = match (
        lookup("VOUCHERS_SEARCH_INTERVAL_SECS").ok(),
        lookup("VOUCHERS_SEARCH_TIME").ok(),
    ) {
        (Some(_), Some(_)) => {
            return Err(invalid(
                "VOUCHERS_SEARCH_INTERVAL_SECS",
                "cannot be combined with VOUCHERS_SEARCH_TIME".to_string(),
            ));
        }
        (Some(_), None) => {
            let secs = parse_u64("VOUCHERS_SEARCH_INTERVAL_SECS", "0")?;
            if secs == 0 {
                return Err(invalid(
                    "VOUCHERS_SEARCH_INTERVAL_SECS",
                    "must be greater than zero".to_string(),
                ));
            }
            Schedule::Interval { secs }
        }
        (None, _) => {
            let hour = parse_u32("VOUCHERS_SEARCH_TIME", "19")?;
            if hour > 23 {
                return Err(invalid(
                    "VOUCHERS_SEARCH_TIME",
                    format!("hour must be 0-23, got {hour}"),
                ));
            }
            let deviation_secs = parse_u64("VOUCHERS_SEARCH_TIME_DEVIATION_SECS", "600")?;
            Schedule::DailyAt {
                hour,
                deviation_secs,
            }
        }
    };

    let pacing = if parse_flag("VOUCHERS_PACING")? {
        Some(Pacing {
            mean_secs: parse_u64("VOUCHERS_PACING_MEAN_SECS", "10")?,
            spread_secs: parse_u64("VOUCHERS_PACING_SPREAD_SECS", "5")?,
            min_secs: parse_u64("VOUCHERS_PACING_MIN_SECS", "3")?,
        })
    } else {
        None
    };

    let blacklist = match lookup("VOUCHERS_CODE_BLACKLIST") {
        Ok(raw) => parse_blacklist(&raw),
        Err(_) => DEFAULT_CODE_BLACKLIST
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
    };
    let filter = FilterConfig {
        blacklist,
        min_code_length: parse_usize("VOUCHERS_MIN_CODE_LENGTH", "4")?,
    };

    let store_url = lookup("VOUCHERS_STORE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let store_token = lookup("VOUCHERS_STORE_TOKEN")
        .ok()
        .filter(|s| !s.trim().is_empty());

    Ok(AppConfig {
        log_level,
        verbose,
        cache_dir,
        site_prefix,
        site_origin,
        overview_url,
        max_voucher_age_secs,
        schedule,
        request_timeout_secs,
        user_agent,
        pacing,
        filter,
        store_url,
        store_token,
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Comma-separated phrases; surrounding whitespace is trimmed, empty entries skipped.
fn parse_blacklist(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
