use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CLUB_NAME: &str = "Cwmbran Badminton Club";

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub port: u16,
    pub api_timeout: Duration,
    pub assets_dir: PathBuf,
    pub club_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("CLUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(ConfigError::Empty { name: "CLUB_API_URL" });
        }

        let port = match lookup("PORT") {
            Some(value) => parse_positive::<u16>("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("API_TIMEOUT_SECS") {
            Some(value) => parse_positive::<u64>("API_TIMEOUT_SECS", &value)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let assets_dir = lookup("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("assets"));

        let club_name = lookup("CLUB_NAME")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLUB_NAME.to_string());

        Ok(Self {
            api_url,
            port,
            api_timeout: Duration::from_secs(timeout_secs),
            assets_dir,
            club_name,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_positive<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n != T::default() => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}
