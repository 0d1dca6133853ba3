use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub tokens: TokenConfig,
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Validity windows for issued tokens
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// How long an invitation token stays redeemable
    pub invite_validity_days: i64,
    /// How long a password-reset token stays redeemable
    pub reset_validity_hours: i64,
}

/// Outbound notification relay settings. With no endpoint configured,
/// notifications are logged and dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    pub endpoint: Option<String>,
    pub secret: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            tokens: TokenConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            invite_validity_days: 15,
            reset_validity_hours: 24,
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            secret: None,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.tokens.invite_validity_days, 15);
        assert_eq!(config.tokens.reset_validity_hours, 24);
        assert!(config.notifier.endpoint.is_none());
        assert_eq!(config.notifier.timeout_secs, 30);
    }
}
