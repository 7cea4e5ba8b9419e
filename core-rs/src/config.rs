/**
 * config.rs
 * Console configuration file (YAML format)
 *
 * Format:
 * ```yaml
 * apiBaseUrl: https://knplqg2pue.execute-api.us-east-1.amazonaws.com/prod
 * authBaseUrl: https://auth.example.com
 * storagePath: /home/me/.sesc/session.json
 * loginPath: /login
 * notifierTimeoutMs: 5000
 * requestTimeoutSecs: 30
 * ```
 *
 * Every field is optional; missing ones take the defaults below.
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ConsoleError;

pub const DEFAULT_API_BASE_URL: &str = "https://knplqg2pue.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_NOTIFIER_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding `apiBaseUrl`
pub const API_BASE_URL_ENV: &str = "SESC_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    pub login_path: String,
    pub notifier_timeout_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_base_url: None,
            storage_path: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            notifier_timeout_ms: DEFAULT_NOTIFIER_TIMEOUT_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ConsoleConfig {
    /// Load config from a YAML file
    ///
    /// # Example
    /// ```no_run
    /// use sesc_core::ConsoleConfig;
    ///
    /// let config = ConsoleConfig::load("sesc.yaml").unwrap();
    /// println!("{}", config.api_base_url);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConsoleError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConsoleError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ConsoleError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: ConsoleConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else defaults; then apply environment overrides
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConsoleError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim().to_string();
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConsoleError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).map_err(|e| {
            ConsoleError::Config(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    pub fn validate(&self) -> Result<(), ConsoleError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConsoleError::Config(format!(
                "apiBaseUrl must be an http(s) URL: {}",
                self.api_base_url
            )));
        }
        if !self.login_path.starts_with('/') {
            return Err(ConsoleError::Config(format!(
                "loginPath must start with '/': {}",
                self.login_path
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConsoleError::Config("requestTimeoutSecs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn auth_base(&self) -> &str {
        self.auth_base_url.as_deref().unwrap_or(&self.api_base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notifier_timeout(&self) -> Duration {
        Duration::from_millis(self.notifier_timeout_ms)
    }

    /// Session file location: configured path, else `~/.sesc/session.json`
    pub fn session_file(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".sesc").join("session.json")
    }
}
