//! Controller settings
//!
//! Loaded from built-in defaults, then an optional TOML file, then `BVC_`
//! environment variables. Nested keys use a double underscore:
//!
//! ```text
//! BVC_NODE=openflow:2
//! BVC_CONTROLLER__RESTCONF_ROOT=http://10.0.0.5:8181/restconf
//! ```

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable naming a config file when none is passed explicitly
pub const CONFIG_FILE_ENV: &str = "BVC_CONFIG_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BvcConfig {
    /// Controller endpoint layout
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Inventory node id of the switch (e.g., "openflow:1")
    #[serde(default = "default_node")]
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// RESTCONF root URL (default: http://127.0.0.1:8181/restconf)
    #[serde(default = "default_restconf_root")]
    pub restconf_root: String,

    /// Inventory container path (default: opendaylight-inventory:nodes)
    #[serde(default = "default_inventory_path")]
    pub inventory_path: String,
}

fn default_node() -> String {
    "openflow:1".to_string()
}

fn default_restconf_root() -> String {
    "http://127.0.0.1:8181/restconf".to_string()
}

fn default_inventory_path() -> String {
    "opendaylight-inventory:nodes".to_string()
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            restconf_root: default_restconf_root(),
            inventory_path: default_inventory_path(),
        }
    }
}

impl Default for BvcConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            node: default_node(),
        }
    }
}

impl BvcConfig {
    /// Load settings. `path` wins over `BVC_CONFIG_FILE`; with neither, only
    /// defaults and environment apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_FILE_ENV).ok();
        let path = path.or(from_env.as_deref().map(Path::new));
        Self::load_with(path, environment())
    }

    pub(crate) fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder.add_source(env).build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot produce usable URLs
    pub fn validate(&self) -> Result<()> {
        if self.node.trim().is_empty() {
            return Err(Error::invalid_config("node must not be empty"));
        }
        let root = &self.controller.restconf_root;
        if !(root.starts_with("http://") || root.starts_with("https://")) {
            return Err(Error::invalid_config(format!(
                "restconf_root must be an http(s) URL, got '{}'",
                root
            )));
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("BVC")
        .prefix_separator("_")
        .separator("__")
}
