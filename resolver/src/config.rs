//! Container configuration and the builder that applies it.

use crate::container::Container;
use crate::error::ConfigError;
use crate::global;

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Tunables for a [`Container`].
///
/// Can be deserialized from YAML or JSON:
///
/// ```yaml
/// register_global: false
/// ```
///
/// Resolution steps are emitted as `tracing` events at `trace` level; filter
/// them with the subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
  /// Install the container in the process-wide slot if the slot is empty.
  #[serde(default = "default_register_global")]
  pub register_global: bool,
}

fn default_register_global() -> bool {
  true
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      register_global: default_register_global(),
    }
  }
}

impl ContainerConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
    serde_yaml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
  }

  pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
  }

  /// Loads a configuration file. `.json` files are parsed as JSON, anything
  /// else as YAML.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let source = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
      Some("json") => Self::from_json_str(&source),
      _ => Self::from_yaml_str(&source),
    }
  }
}

/// A builder for creating [`Container`] instances.
#[derive(Debug, Clone, Default)]
pub struct ContainerBuilder {
  config: ContainerConfig,
}

impl ContainerBuilder {
  /// Replaces every setting with those from `config`.
  pub fn config(mut self, config: ContainerConfig) -> Self {
    self.config = config;
    self
  }

  /// Whether the built container claims the process-wide slot when it is
  /// empty. Defaults to `true`.
  pub fn register_global(mut self, register: bool) -> Self {
    self.config.register_global = register;
    self
  }

  pub fn build(self) -> Container {
    let register = self.config.register_global;
    let container = Container::from_config(self.config);
    if register && global::install_if_vacant(&container) {
      debug!("container installed as the active instance");
    }
    container
  }
}
