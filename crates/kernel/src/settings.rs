use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use serde::Deserialize;

const ENV_VAR: &str = "MARQUEE_ENV";
const CONFIG_DIR_VAR: &str = "MARQUEE_CONFIG_DIR";
const ENV_PREFIX: &str = "MARQUEE";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Deployment environment the service runs in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "local" => Ok(Self::Local),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => {
                bail!("unsupported environment '{other}'; expected local/staging/production")
            }
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration from layered sources: an optional `.env` file,
    /// `config/base.toml`, a per-environment overlay, then `MARQUEE_*`
    /// environment variables. Every source is optional; defaults fill the
    /// rest.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let env_name = std::env::var(ENV_VAR).unwrap_or_else(|_| "local".to_string());
        let environment = Environment::from_str(&env_name)?;

        let config_dir = config_dir();
        let overlay = config_dir.join(format!("{env_name}.toml"));

        let cfg = config::Config::builder()
            .add_source(config::File::from(config_dir.join("base.toml")).required(false))
            .add_source(config::File::from(overlay).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("_"))
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;
        settings.environment = environment;

        Ok(settings)
    }
}

fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .unwrap_or_else(|_| PathBuf::from("config"))
        })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_server_listens_on_port_5000() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn environment_names_parse_case_sensitively() {
        assert_eq!(
            Environment::from_str("production").unwrap(),
            Environment::Production
        );
        assert!(Environment::from_str("Production").is_err());
        assert!(Environment::from_str("qa").is_err());
    }

    #[test]
    fn default_log_format_is_pretty() {
        let settings = Settings::default();
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }
}
