use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub sync: SyncConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Opaque identity-proof token injected by the host environment,
    /// attached to every request. Never read from the config file.
    #[serde(skip)]
    pub identity_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub price_refresh_secs: u64,
    pub position_refresh_secs: u64,
    pub trade_cooldown_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub notice_ttl_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Color tokens supplied by the host environment. Unset tokens fall back to
/// the built-in palette at render time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeConfig {
    pub accent: Option<String>,
    pub long: Option<String>,
    pub short: Option<String>,
    pub hint: Option<String>,
}

impl SyncConfig {
    fn validate(&self) -> Result<()> {
        if self.price_refresh_secs == 0 {
            bail!("sync.price_refresh_secs must be > 0");
        }
        if self.position_refresh_secs == 0 {
            bail!("sync.position_refresh_secs must be > 0");
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config: Config =
            toml::from_str(&config_str).context("failed to parse config/default.toml")?;

        config.service.identity_token = std::env::var("NADO_IDENTITY_TOKEN")
            .context("NADO_IDENTITY_TOKEN not set in .env or environment")?;

        config.sync.validate()?;
        if config.service.base_url.trim().is_empty() {
            bail!("service.base_url must not be empty");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
[service]
base_url = "https://nado.example.com"
request_timeout_secs = 10

[sync]
price_refresh_secs = 15
position_refresh_secs = 30
trade_cooldown_ms = 1000

[ui]
refresh_rate_ms = 100
notice_ttl_ms = 3000

[logging]
level = "info"
"#
    }

    #[test]
    fn parse_default_toml() {
        let config: Config = toml::from_str(sample_toml()).unwrap();
        assert_eq!(config.service.base_url, "https://nado.example.com");
        assert_eq!(config.sync.price_refresh_secs, 15);
        assert_eq!(config.sync.position_refresh_secs, 30);
        assert_eq!(config.sync.trade_cooldown_ms, 1000);
        assert_eq!(config.ui.notice_ttl_ms, 3000);
        assert!(config.theme.accent.is_none());
    }

    #[test]
    fn theme_section_is_optional_per_token() {
        let toml_str = format!("{}\n[theme]\naccent = \"#f5a623\"\n", sample_toml());
        let config: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.theme.accent.as_deref(), Some("#f5a623"));
        assert!(config.theme.long.is_none());
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let mut config: Config = toml::from_str(sample_toml()).unwrap();
        config.sync.price_refresh_secs = 0;
        assert!(config.sync.validate().is_err());
        config.sync.price_refresh_secs = 15;
        config.sync.position_refresh_secs = 0;
        assert!(config.sync.validate().is_err());
    }
}
