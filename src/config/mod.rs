//! Configuration management.
//!
//! Configuration is read from `~/.config/tessera/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is
//! created. Missing fields fall back to defaults.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::feed::DEFAULT_FEED_URL;

pub const DEFAULT_MEMORY_CACHE_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote feed resource; one URL is the whole remote contract.
    pub feed_url: String,

    /// Root directory for the per-namespace disk caches. Defaults to the
    /// platform cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Budget for decoded images held in memory, in bytes.
    pub memory_cache_limit: usize,

    /// Per-request HTTP timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            cache_dir: None,
            memory_cache_limit: DEFAULT_MEMORY_CACHE_LIMIT,
            http_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// The cache root: configured directory, or `<platform cache dir>/tessera`.
    pub fn cache_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let base = dirs::cache_dir().ok_or(ConfigError::NoCacheDir)?;
                Ok(base.join("tessera"))
            }
        }
    }

    /// Get the default config file path: `~/.config/tessera/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tessera").join("config.toml"))
    }

    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        format!(
            r##"# Tessera configuration

# Remote image feed (one URL per line, optionally thumbnail + original + caption)
feed_url = "{DEFAULT_FEED_URL}"

# Root directory for the disk caches. Uncomment to override the platform default.
# cache_dir = "/tmp/tessera-cache"

# Budget for decoded images held in memory, in bytes.
memory_cache_limit = {DEFAULT_MEMORY_CACHE_LIMIT}

# Per-request HTTP timeout in seconds.
http_timeout_secs = 30
"##
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine cache directory")]
    NoCacheDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_content_deserializes() {
        let config: Config = toml::from_str(&Config::default_config_content())
            .expect("default config should be valid TOML");
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.memory_cache_limit, DEFAULT_MEMORY_CACHE_LIMIT);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(r#"feed_url = "https://example.com/feed.txt""#)
            .expect("partial config should work");
        assert_eq!(config.feed_url, "https://example.com/feed.txt");
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.cache_dir, None);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").expect("empty config should work");
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.memory_cache_limit, DEFAULT_MEMORY_CACHE_LIMIT);
    }
}
