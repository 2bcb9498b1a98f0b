//! Settings are read from an optional TOML file (`settings.toml` unless
//! `--config` says otherwise) and then from `BILLKEEPER_*` environment
//! variables, e.g. `BILLKEEPER_MAIL__API_KEY`.

use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Mail {
    pub api_key: String,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Mail {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_from() -> String {
    "Bill Keeper <onboarding@resend.dev>".to_string()
}

fn default_endpoint() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub storage: Storage,
    pub mail: Option<Mail>,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_sources(
            File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false),
            Environment::with_prefix("BILLKEEPER")
                .prefix_separator("_")
                .separator("__"),
        )
    }

    fn from_sources<F, E>(file: F, env: E) -> Result<Self, ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
        E: config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("app.level", "info")?
            .set_default("storage.dir", "data")?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_sources(
            File::from_str(toml, FileFormat::Toml),
            Environment::with_prefix("BILLKEEPER_TEST_UNUSED"),
        )
    }

    #[test]
    fn defaults_without_file() {
        let settings = parse("").unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.storage.dir, PathBuf::from("data"));
        assert!(settings.mail.is_none());
    }

    #[test]
    fn mail_section_fills_defaults() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [mail]
            api_key = "re_test"
            "#,
        )
        .unwrap();

        let mail = settings.mail.unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(mail.api_key, "re_test");
        assert_eq!(mail.from, "Bill Keeper <onboarding@resend.dev>");
        assert_eq!(mail.endpoint, "https://api.resend.com/emails");
        assert_eq!(mail.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn mail_requires_api_key() {
        assert!(parse("[mail]\nfrom = \"me@example.lk\"").is_err());
    }
}
