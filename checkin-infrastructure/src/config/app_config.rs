use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use checkin_domain::RuntimeConfig;

use crate::config::validation::{validate_bind_addr, validate_store_backend};

pub const CONFIG_PATH_ENV: &str = "CHECKIN_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store_backend: String,
    pub data_dir: String,
    pub log_dir: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub dead_letter_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            store_backend: "file".to_string(),
            data_dir: "./data".to_string(),
            log_dir: None,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            dead_letter_capacity: 256,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(file_path.parent());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        self.store_backend = self.store_backend.trim().to_lowercase();
        if let Some(log_dir) = &self.log_dir {
            if log_dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.data_dir = resolve_path(base, &self.data_dir);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_bind_addr(&self.bind_addr)?;
        validate_store_backend(&self.store_backend)?;
        if self.store_backend == "file" && self.data_dir.trim().is_empty() {
            return Err(anyhow!("data_dir must not be empty for the file store"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.dead_letter_capacity == 0 {
            return Err(anyhow!("dead_letter_capacity must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            store_backend: self.store_backend.clone(),
            data_dir: self.data_dir.clone(),
            log_dir: self.log_dir.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            dead_letter_capacity: self.dead_letter_capacity,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("CHECKIN_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("CHECKIN_STORE_BACKEND") {
            self.store_backend = value;
        }
        if let Ok(value) = env::var("CHECKIN_DATA_DIR") {
            self.data_dir = value;
        }
        if let Ok(value) = env::var("CHECKIN_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Ok(value) = env::var("CHECKIN_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("CHECKIN_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("CHECKIN_DEAD_LETTER_CAPACITY") {
            self.dead_letter_capacity = value.parse().unwrap_or(self.dead_letter_capacity);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
