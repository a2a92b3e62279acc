use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use url::Url;

use crate::gateway::DEFAULT_GATEWAY_TIMEOUT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Primary gateway (JSON).
    pub gateway_a_endpoint: String,
    /// Fallback gateway (XML).
    pub gateway_b_endpoint: String,
    pub gateway_timeout: Duration,
    pub log_format: LogFormat,
    pub log_request_body: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            gateway_a_endpoint: parse_endpoint(
                "GATEWAY_A_ENDPOINT",
                &env::var("GATEWAY_A_ENDPOINT")?,
            )?,
            gateway_b_endpoint: parse_endpoint(
                "GATEWAY_B_ENDPOINT",
                &env::var("GATEWAY_B_ENDPOINT")?,
            )?,
            gateway_timeout: parse_timeout(env::var("GATEWAY_TIMEOUT_SECS").ok().as_deref())?,
            log_format: parse_log_format(env::var("LOG_FORMAT").ok().as_deref())?,
            log_request_body: env::var("LOG_REQUEST_BODY")
                .ok()
                .and_then(|value| value.parse::<bool>().ok())
                .unwrap_or(false),
        })
    }
}

fn parse_endpoint(name: &str, raw: &str) -> anyhow::Result<String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("{name} is not a valid URL: {e}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("{name} must be an http or https URL, got scheme '{}'", url.scheme());
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn parse_timeout(raw: Option<&str>) -> anyhow::Result<Duration> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_GATEWAY_TIMEOUT);
    };

    let secs: u64 = raw.trim().parse()?;
    if secs == 0 {
        anyhow::bail!("GATEWAY_TIMEOUT_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn parse_log_format(raw: Option<&str>) -> anyhow::Result<LogFormat> {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("text") => Ok(LogFormat::Text),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{other}'"),
    }
}
