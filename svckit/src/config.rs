use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub listings: ListingsConfig,
    pub images: ImagesConfig,
    pub admin_gate: AdminGateConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the persisted client state
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".biznest/storage.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingsConfig {
    pub page_size: u32,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub max_concurrent_fetches: usize,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminGateMode {
    /// Fixed credential pair, development and demo builds only
    #[default]
    DemoCredentials,
    /// Log in and require ROLE_ADMIN on the authenticated user
    ServerRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminGateConfig {
    pub mode: AdminGateMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: Some(PathBuf::from("biznest-dash.log")),
        }
    }
}

/// Load client config from a YAML file and BIZNEST_* environment overrides.
/// A missing file is not an error; defaults fill every field.
pub fn load_config(path: &str) -> Result<ClientConfig> {
    let config = Config::builder()
        .add_source(File::with_name(path).required(Path::new(path).exists()))
        .add_source(
            config::Environment::with_prefix("BIZNEST")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = load_config("does/not/exist.yaml").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.listings.page_size, 10);
        assert_eq!(config.images.max_concurrent_fetches, 4);
        assert_eq!(config.admin_gate.mode, AdminGateMode::DemoCredentials);
    }

    #[test]
    fn test_yaml_overrides() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "api:\n  base_url: http://api.biznest.test\nadmin_gate:\n  mode: server_role\nimages:\n  max_concurrent_fetches: 2"
        )
        .unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.api.base_url, "http://api.biznest.test");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.admin_gate.mode, AdminGateMode::ServerRole);
        assert_eq!(config.images.max_concurrent_fetches, 2);
    }
}
