use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UAST_URL: &str = "http://127.0.0.1:9432";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of `uastgate.toml`; every field is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UastgateConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub uast_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl UastgateConfig {
    /// A config with every default spelled out, for `init`
    pub fn defaults() -> Self {
        Self {
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            uast_url: Some(DEFAULT_UAST_URL.to_string()),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Fields set in `other` win
    pub fn merged_with(self, other: UastgateConfig) -> Self {
        Self {
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            uast_url: other.uast_url.or(self.uast_url),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }
}

/// Fully resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub uast_url: String,
    pub timeout: Duration,
}

impl ServerConfig {
    /// Resolve settings: CLI overrides, then the config file, then defaults
    pub fn resolve(file: Option<UastgateConfig>, overrides: UastgateConfig) -> Self {
        let merged = file.unwrap_or_default().merged_with(overrides);
        Self {
            host: merged.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: merged.port.unwrap_or(DEFAULT_PORT),
            uast_url: merged.uast_url.unwrap_or_else(|| DEFAULT_UAST_URL.to_string()),
            timeout: Duration::from_secs(merged.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::resolve(None, UastgateConfig::default())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("uastgate.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<UastgateConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: UastgateConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &UastgateConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
