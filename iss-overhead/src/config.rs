use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::module::pass::{DEFAULT_PASS_COUNT, MAX_PASS_COUNT};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "ISS_OVERHEAD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverheadConfig {
    /// IP echo endpoint, queried as-is
    #[serde(default = "default_ip_url")]
    pub ip_url: String,

    /// Geolocation service base; `/json/<ip>` is appended
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,

    /// Pass prediction base; `/iss-pass.json?...` is appended
    #[serde(default = "default_pass_base_url")]
    pub pass_base_url: String,

    #[serde(default = "default_pass_count")]
    pub pass_count: u32,

    /// Per-request timeout enforced by the HTTP client
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for daily log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_ip_url() -> String {
    "https://api.ipify.org/?format=json".to_string()
}

fn default_geo_base_url() -> String {
    "http://ip-api.com".to_string()
}

fn default_pass_base_url() -> String {
    "http://api.open-notify.org".to_string()
}

fn default_pass_count() -> u32 {
    DEFAULT_PASS_COUNT
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("iss-overhead/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for OverheadConfig {
    fn default() -> Self {
        Self {
            ip_url: default_ip_url(),
            geo_base_url: default_geo_base_url(),
            pass_base_url: default_pass_base_url(),
            pass_count: default_pass_count(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl OverheadConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: OverheadConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pass_count == 0 || self.pass_count > MAX_PASS_COUNT {
            anyhow::bail!(
                "pass_count must be between 1 and {}, got {}",
                MAX_PASS_COUNT,
                self.pass_count
            );
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub static CONFIG: OnceLock<OverheadConfig> = OnceLock::new();

/// Config file in use: `ISS_OVERHEAD_CONFIG`, else `config.toml`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load the config at [`config_path`] into [`CONFIG`].
pub fn read_config() -> anyhow::Result<&'static OverheadConfig> {
    let config = OverheadConfig::load_or_default(config_path())?;
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = OverheadConfig::default();
        assert_eq!(config.pass_count, 5);
        assert_eq!(config.geo_base_url, "http://ip-api.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.log_dir.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = OverheadConfig::from_toml("").unwrap();
        assert_eq!(config.ip_url, default_ip_url());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_override() {
        let config = OverheadConfig::from_toml(
            r#"
pass_base_url = "http://localhost:8080"
pass_count = 10
log_dir = "logs"
"#,
        )
        .unwrap();
        assert_eq!(config.pass_base_url, "http://localhost:8080");
        assert_eq!(config.pass_count, 10);
        assert_eq!(config.log_dir.as_deref(), Some("logs"));
        assert_eq!(config.geo_base_url, "http://ip-api.com");
    }

    #[test]
    fn test_rejects_out_of_range_pass_count() {
        assert!(OverheadConfig::from_toml("pass_count = 0").is_err());
        assert!(OverheadConfig::from_toml("pass_count = 101").is_err());
        assert!(OverheadConfig::from_toml("pass_count = 100").is_ok());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(OverheadConfig::from_toml("request_timeout_secs = 0").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"log_level = \"debug\"\nrequest_timeout_secs = 5\n").unwrap();
        file.flush().unwrap();

        let config = OverheadConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = OverheadConfig::load_or_default("/nonexistent/iss-overhead.toml").unwrap();
        assert_eq!(config.pass_count, 5);
    }

    #[test]
    fn test_loading_emits_no_events() {
        // Runs before logging is initialised, so anything logged here is lost
        let (logs, _guard) = crate::test_support::CapturedLogs::install();

        OverheadConfig::load_or_default("/nonexistent/iss-overhead.toml").unwrap();

        assert_eq!(logs.contents(), "");
    }

    #[test]
    fn test_config_path_default() {
        if std::env::var_os(CONFIG_PATH_ENV).is_none() {
            assert_eq!(config_path(), PathBuf::from("config.toml"));
        }
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"pass_count = \"many\"").unwrap();
        file.flush().unwrap();

        assert!(OverheadConfig::load_or_default(file.path()).is_err());
    }
}
