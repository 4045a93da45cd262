use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SCHEDULE_WINDOW_DAYS: u32 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub schedule_window_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            schedule_window_days: DEFAULT_SCHEDULE_WINDOW_DAYS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("PORTAL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_API_URL not set, using default");
                    DEFAULT_API_BASE_URL.to_string()
                }),
            api_token: match env::var("PORTAL_API_TOKEN") {
                Ok(token) if !token.trim().is_empty() => Some(token),
                _ => {
                    warn!("PORTAL_API_TOKEN not set, requests will be sent unauthenticated");
                    None
                }
            },
            request_timeout_secs: parse_or_default(
                "PORTAL_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            schedule_window_days: parse_or_default(
                "PORTAL_SCHEDULE_WINDOW_DAYS",
                DEFAULT_SCHEDULE_WINDOW_DAYS,
            ),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.trim().is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", key, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_api() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api");
        assert!(config.api_token.is_none());
        assert_eq!(config.schedule_window_days, 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.is_configured());
    }

    #[test]
    fn blank_base_url_is_not_configured() {
        let config = AppConfig {
            api_base_url: "  ".to_string(),
            ..AppConfig::default()
        };
        assert!(!config.is_configured());
    }
}
