use std::time::Duration;

use tickerwatch_market_data::provider::finnhub::DEFAULT_BASE_URL;

const DEFAULT_API_KEY: &str = "demo";
const DEFAULT_DB_PATH: &str = "./tickerwatch-data/tickerwatch.db";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub db_path: String,
    /// Overrides the provider's advertised request spacing when set.
    pub min_request_delay: Option<Duration>,
    pub refresh_interval: Duration,
    pub synthetic_history: bool,
    pub log_format: LogFormat,
    /// Problems found while reading the environment. Logged once tracing is up.
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let api_key = lookup("TW_FINNHUB_API_KEY")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string());
        let base_url = lookup("TW_FINNHUB_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let db_path = lookup("TW_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());

        let min_request_delay = lookup("TW_MIN_REQUEST_DELAY_MS").and_then(|raw| {
            match raw.trim().parse::<u64>() {
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => {
                    warnings.push(format!(
                        "Invalid TW_MIN_REQUEST_DELAY_MS value '{}', using the provider limit",
                        raw
                    ));
                    None
                }
            }
        });
        let refresh_secs = parse_or(
            &lookup,
            "TW_REFRESH_INTERVAL_SECS",
            DEFAULT_REFRESH_INTERVAL_SECS,
            |s| s.parse().ok().filter(|secs| *secs > 0),
            &mut warnings,
        );
        let synthetic_history = parse_or(
            &lookup,
            "TW_SYNTHETIC_HISTORY",
            true,
            parse_bool,
            &mut warnings,
        );
        let log_format = parse_or(
            &lookup,
            "TW_LOG_FORMAT",
            LogFormat::Text,
            |s| match s.to_ascii_lowercase().as_str() {
                "text" => Some(LogFormat::Text),
                "json" => Some(LogFormat::Json),
                _ => None,
            },
            &mut warnings,
        );

        if api_key == DEFAULT_API_KEY {
            warnings.push(
                "TW_FINNHUB_API_KEY is not set; using the rate-limited demo key".to_string(),
            );
        }

        Self {
            api_key,
            base_url,
            db_path,
            min_request_delay,
            refresh_interval: Duration::from_secs(refresh_secs),
            synthetic_history,
            log_format,
            warnings,
        }
    }
}

fn parse_or<T: std::fmt::Debug>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
    warnings: &mut Vec<String>,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => parse(raw.trim()).unwrap_or_else(|| {
            warnings.push(format!(
                "Invalid {} value '{}', using {:?}",
                key, raw, default
            ));
            default
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
