//! Simulator configuration loaded from YAML.
//!
//! ```yaml
//! port_naming: map
//! port_map:
//!   - lanes: [1, 2, 3, 4]
//!     device: swp1
//! queues_per_port: 8
//! ```

use saisim_types::MacAddress;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How port objects are bound to host network devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortNaming {
    /// `eth1`, `eth2`, ... in creation order.
    #[default]
    Sequential,
    /// `eth<first lane>`.
    Lanes,
    /// Looked up in `port_map` by lane list.
    Map,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapEntry {
    pub lanes: Vec<u32>,
    pub device: String,
}

/// Port created right after the switch when the daemon starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootPort {
    pub lanes: Vec<u32>,
    #[serde(default = "default_speed")]
    pub speed: u32,
}

fn default_speed() -> u32 {
    100_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaisimConfig {
    pub port_naming: PortNaming,
    pub device_prefix: String,
    pub port_map: Vec<PortMapEntry>,
    pub queues_per_port: u32,
    pub scheduler_groups_per_port: u32,
    pub switch_mac: MacAddress,
    /// Look for backing devices under /sys/class/net.
    pub check_devices: bool,
    pub boot_ports: Vec<BootPort>,
}

impl Default for SaisimConfig {
    fn default() -> Self {
        Self {
            port_naming: PortNaming::Sequential,
            device_prefix: "eth".to_string(),
            port_map: Vec::new(),
            queues_per_port: 12,
            scheduler_groups_per_port: 12,
            switch_mac: MacAddress::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
            check_devices: true,
            boot_ports: Vec::new(),
        }
    }
}

impl SaisimConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: SaisimConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port_naming == PortNaming::Map && self.port_map.is_empty() {
            return Err(ConfigError::Invalid(
                "port_naming is map but port_map is empty".to_string(),
            ));
        }
        if let Some(entry) = self.port_map.iter().find(|e| e.lanes.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "port_map entry for {} has no lanes",
                entry.device
            )));
        }
        if self.device_prefix.is_empty() {
            return Err(ConfigError::Invalid("device_prefix is empty".to_string()));
        }
        Ok(())
    }
}
