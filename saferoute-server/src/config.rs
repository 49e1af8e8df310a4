//! TOML configuration of the server

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use saferoute_core::{DatasetConfig, RoutingConfig, model::Location};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Local gazetteer of named places
    #[serde(default)]
    pub places: Vec<Location>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 30,
            concurrency_limit: 64,
        }
    }
}

impl AppConfig {
    /// Reads `path`; relative dataset paths are taken relative to the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid values
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.server.concurrency_limit == 0 {
            return Err(ConfigError::Invalid(
                "server.concurrency_limit must be positive".to_string(),
            ));
        }
        if let Some(place) = self.places.iter().find(|place| !place.is_valid()) {
            return Err(ConfigError::Invalid(format!(
                "place '{}' has out of range coordinates",
                place.display_label()
            )));
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let dataset = &mut self.dataset;
        for path in [&mut dataset.nodes_dir, &mut dataset.edges_dir] {
            *path = absolutize(base, path);
        }
        for path in [
            &mut dataset.incidents_path,
            &mut dataset.emergency_services_path,
            &mut dataset.parking_path,
        ]
        .into_iter()
        .flatten()
        {
            *path = absolutize(base, path);
        }
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}
