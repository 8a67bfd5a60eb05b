//! Configuration management for the notification center CLI.

use anyhow::{bail, Context, Result};
use notification_center::{ClickStrategy, FetchMode, NotificationCenterConfig, NotificationClient};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Settings given on the command line, applied over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub base_url: Option<String>,
    pub lang: Option<String>,
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;

    Ok(exe_dir.join("notification-center.toml"))
}

/// Load configuration from file.
pub fn load_config() -> Result<NotificationCenterConfig> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(NotificationCenterConfig::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &NotificationCenterConfig) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

/// Load the config file and apply command line overrides.
pub fn effective_config(overrides: &Overrides) -> Result<NotificationCenterConfig> {
    let mut config = load_config()?;

    if let Some(endpoint) = &overrides.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(base_url) = &overrides.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(lang) = &overrides.lang {
        config.lang = Some(lang.clone());
    }

    Ok(config)
}

/// Build a notification client from the effective configuration.
pub fn build_client(overrides: &Overrides) -> Result<NotificationClient> {
    effective_config(overrides)?
        .build_client()
        .context("Failed to build notification client")
}

/// Set a single configuration value by key.
pub fn set_value(config: &mut NotificationCenterConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "endpoint" => config.endpoint = value.to_owned(),
        "base_url" => config.base_url = value.to_owned(),
        "limit" => config.limit = value.parse().context("limit must be a positive integer")?,
        "skip_query_param" => config.skip_query_param = value.to_owned(),
        "limit_query_param" => config.limit_query_param = value.to_owned(),
        "click_strategy" => config.click_strategy = value.parse::<ClickStrategy>()?,
        "allow_external_hrefs" => {
            config.allow_external_hrefs = value.parse().context("expected true or false")?
        }
        "link_target" => config.link_target = value.to_owned(),
        "push_state_key" => config.push_state_key = value.to_owned(),
        "mode" => {
            config.mode = match value {
                "once" => FetchMode::Once,
                "polling" => FetchMode::Polling,
                other => bail!("unknown mode `{}`", other),
            }
        }
        "polling_frequency_ms" => {
            config.polling_frequency_ms = value.parse().context("expected milliseconds")?
        }
        "request_timeout_ms" => {
            config.request_timeout_ms = value.parse().context("expected milliseconds")?
        }
        "lang" => config.lang = Some(value.to_owned()).filter(|v| !v.is_empty()),
        other => bail!("unknown config key `{}`", other),
    }

    Ok(())
}

/// Add or remove a request header. An empty value removes it.
pub fn set_header(config: &mut NotificationCenterConfig, name: &str, value: &str) {
    if value.is_empty() {
        config.headers.remove(name);
    } else {
        config.headers.insert(name.to_owned(), value.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value() {
        let mut config = NotificationCenterConfig::default();
        set_value(&mut config, "limit", "25").unwrap();
        set_value(&mut config, "click_strategy", "push").unwrap();
        set_value(&mut config, "mode", "polling").unwrap();

        assert_eq!(config.limit, 25);
        assert_eq!(config.click_strategy, ClickStrategy::Push);
        assert_eq!(config.mode, FetchMode::Polling);
        assert!(set_value(&mut config, "colour", "blue").is_err());
        assert!(set_value(&mut config, "limit", "ten").is_err());
    }

    #[test]
    fn test_set_header() {
        let mut config = NotificationCenterConfig::default();
        set_header(&mut config, "Authorization", "Bearer x");
        assert_eq!(config.headers.len(), 1);
        set_header(&mut config, "Authorization", "");
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_toml_round_trip_keeps_locales() {
        let content = r#"
            endpoint = "https://example.com/notifications"
            limit = 5

            [locales]
            title = "Avvisi"

            [locales.reload]
            en = "Refresh"
            it = "Ricarica"
        "#;
        let config: NotificationCenterConfig = toml::from_str(content).unwrap();
        assert_eq!(config.limit, 5);
        assert_eq!(config.locales.len(), 2);

        let saved = toml::to_string_pretty(&config).unwrap();
        let reloaded: NotificationCenterConfig = toml::from_str(&saved).unwrap();
        assert_eq!(reloaded, config);
    }
}
