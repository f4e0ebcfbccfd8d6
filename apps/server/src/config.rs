//! Application configuration.
//!
//! Secrets come from the environment; everything else has defaults that can
//! be overridden by an optional JSON settings file.

use pricebot_alerts::{ChatId, ResponderConfig};
use pricebot_core::{utc_offset, AlertWindow, CandleInterval, CoreError, Symbol, Watchlist};
use pricebot_engine::{MonitorConfig, MonitorConfigError};
use pricebot_feeds::RestConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}; set it in the environment or a .env file")]
    MissingEnv(&'static str),
    #[error("TELEGRAM_CHAT_ID must be a numeric chat id, got '{0}'")]
    InvalidChatId(String),
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Value(#[from] CoreError),
    #[error("Invalid monitor settings: {0}")]
    Monitor(#[from] MonitorConfigError),
    #[error("http_timeout_secs must be non-zero")]
    ZeroHttpTimeout,
}

/// Bot token and target chat.
#[derive(Clone)]
pub struct TelegramSecrets {
    pub bot_token: String,
    pub chat_id: ChatId,
}

impl std::fmt::Debug for TelegramSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSecrets")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramSecrets {
    /// Read TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(key))
        };

        let bot_token = read(BOT_TOKEN_VAR)?;
        let chat_id_raw = read(CHAT_ID_VAR)?;
        let chat_id = chat_id_raw
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidChatId(chat_id_raw.clone()))?;

        Ok(Self {
            bot_token,
            chat_id: ChatId(chat_id),
        })
    }
}

/// Alert window bounds as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSettings {
    pub start: String,
    pub end: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            start: "07:00".to_string(),
            end: "21:30".to_string(),
        }
    }
}

/// Liveness endpoint bind address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LivenessSettings {
    pub host: String,
    pub port: u16,
}

impl Default for LivenessSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Application configuration.
///
/// Unknown keys are rejected so a misspelled setting never falls back to
/// its default unnoticed. Logging is configured from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Symbols checked by the monitor.
    pub watchlist: Watchlist,
    /// Quote asset for every pair.
    pub quote_asset: String,
    /// Candle granularity for the monitor.
    pub candle_interval: CandleInterval,
    /// Minimum absolute move in percent.
    pub threshold_pct: f64,
    /// Time of day during which alerts are sent.
    pub alert_window: WindowSettings,
    /// Offset of the alert window clock.
    pub utc_offset_hours: i32,
    /// Seconds between monitor cycles.
    pub poll_interval_secs: u64,
    /// Seconds before `/p` replies are deleted.
    pub cleanup_delay_secs: u64,
    /// Timeframe label when `/p` names none.
    pub default_timeframe: String,
    /// Pseudo-symbols answered with the dominance metric.
    pub dominance_aliases: Vec<String>,
    /// Liveness endpoint.
    pub liveness: LivenessSettings,
    /// Per-request HTTP timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watchlist: Watchlist::default(),
            quote_asset: "USDT".to_string(),
            candle_interval: CandleInterval::FiveMinutes,
            threshold_pct: 5.0,
            alert_window: WindowSettings::default(),
            utc_offset_hours: 7,
            poll_interval_secs: 600,
            cleanup_delay_secs: 30,
            default_timeframe: "15m".to_string(),
            dominance_aliases: vec!["BTC.D".to_string(), "DOM".to_string()],
            liveness: LivenessSettings::default(),
            http_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Defaults, or the JSON file at `path` layered over the defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Validated monitor settings alerting `chat_id`.
    pub fn monitor_config(&self, chat_id: ChatId) -> Result<MonitorConfig, ConfigError> {
        let config = MonitorConfig {
            watchlist: self.watchlist.clone(),
            interval: self.candle_interval,
            sample_count: 2,
            threshold_pct: self.threshold_pct,
            window: AlertWindow::parse(&self.alert_window.start, &self.alert_window.end)?,
            utc_offset: utc_offset(self.utc_offset_hours)?,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            chat_id,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn responder_config(&self) -> ResponderConfig {
        ResponderConfig {
            default_timeframe: self.default_timeframe.clone(),
            dominance_aliases: self.dominance_aliases.iter().map(|a| Symbol::new(a)).collect(),
            cleanup_delay: Duration::from_secs(self.cleanup_delay_secs),
            quote_asset: self.quote_asset.clone(),
            ..Default::default()
        }
    }

    pub fn rest_config(&self) -> Result<RestConfig, ConfigError> {
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ZeroHttpTimeout);
        }
        Ok(RestConfig {
            quote_asset: self.quote_asset.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
            ..Default::default()
        })
    }

    pub fn liveness_addr(&self) -> String {
        format!("{}:{}", self.liveness.host, self.liveness.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_secrets_from_lookup() {
        let secrets = TelegramSecrets::from_lookup(lookup(&[
            (BOT_TOKEN_VAR, "123:abc"),
            (CHAT_ID_VAR, "-1001234"),
        ]))
        .unwrap();
        assert_eq!(secrets.bot_token, "123:abc");
        assert_eq!(secrets.chat_id, ChatId(-1001234));
        assert!(!format!("{:?}", secrets).contains("123:abc"));
    }

    #[test]
    fn test_missing_token_is_error() {
        let err = TelegramSecrets::from_lookup(lookup(&[(CHAT_ID_VAR, "1")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(BOT_TOKEN_VAR)));
        assert!(err.to_string().contains(BOT_TOKEN_VAR));
    }

    #[test]
    fn test_empty_chat_id_is_missing() {
        let err = TelegramSecrets::from_lookup(lookup(&[(BOT_TOKEN_VAR, "t"), (CHAT_ID_VAR, "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(CHAT_ID_VAR)));
    }

    #[test]
    fn test_non_numeric_chat_id() {
        let err = TelegramSecrets::from_lookup(lookup(&[(BOT_TOKEN_VAR, "t"), (CHAT_ID_VAR, "@group")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChatId(_)));
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.threshold_pct, 5.0);
        assert_eq!(config.liveness_addr(), "0.0.0.0:8080");
        let monitor = config.monitor_config(ChatId(7)).unwrap();
        assert_eq!(monitor.window, AlertWindow::default());
        assert_eq!(monitor.chat_id, ChatId(7));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"watchlist": ["btc", "eth"], "alert_window": {"start": "21:30", "end": "06:00"}, "liveness": {"port": 9000}}"#,
        )
        .unwrap();
        assert_eq!(config.watchlist, Watchlist::new(["BTC", "ETH"]));
        assert_eq!(config.poll_interval_secs, 600);
        assert_eq!(config.liveness_addr(), "0.0.0.0:9000");
        let monitor = config.monitor_config(ChatId(1)).unwrap();
        assert!(monitor.window.is_overnight());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = AppConfig {
            alert_window: WindowSettings {
                start: "7am".to_string(),
                end: "21:30".to_string(),
            },
            ..Default::default()
        };
        assert!(matches!(config.monitor_config(ChatId(1)), Err(ConfigError::Value(_))));

        let config = AppConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.monitor_config(ChatId(1)), Err(ConfigError::Monitor(_))));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("pricebot-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"threshold_pct": 3.5, "candle_interval": "15m"}"#).unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        assert_eq!(config.threshold_pct, 3.5);
        assert_eq!(config.candle_interval, CandleInterval::FifteenMinutes);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(AppConfig::load(path.to_str()), Err(ConfigError::Io { .. })));
        assert_eq!(AppConfig::load(None).unwrap().threshold_pct, 5.0);
    }

    #[test]
    fn test_responder_and_rest_config() {
        let config = AppConfig::default();
        let responder = config.responder_config();
        assert!(responder.is_dominance_alias(&Symbol::new("dom")));
        assert_eq!(responder.cleanup_delay, Duration::from_secs(30));
        assert_eq!(config.rest_config().unwrap().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = serde_json::from_str::<AppConfig>(r#"{"log_level": "debug"}"#).unwrap_err();
        assert!(err.to_string().contains("log_level"));
        assert!(serde_json::from_str::<AppConfig>(r#"{"liveness": {"prot": 9000}}"#).is_err());
    }

    #[test]
    fn test_zero_http_timeout_rejected() {
        let config: AppConfig = serde_json::from_str(r#"{"http_timeout_secs": 0}"#).unwrap();
        assert!(matches!(config.rest_config(), Err(ConfigError::ZeroHttpTimeout)));
    }
}
