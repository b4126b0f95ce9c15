//! Binding of port objects to host network devices.

use crate::config::{PortNaming, SaisimConfig};
use saisim_types::{SaiError, SaiResult};
use std::collections::HashSet;
use std::path::Path;

/// Answers whether a network device exists on the host.
pub trait HostDevices: Send + Sync {
    fn exists(&self, device: &str) -> bool;
}

/// Looks devices up under /sys/class/net.
#[derive(Debug, Default)]
pub struct SysfsDevices;

impl HostDevices for SysfsDevices {
    fn exists(&self, device: &str) -> bool {
        Path::new("/sys/class/net").join(device).exists()
    }
}

/// Fixed device set; every device exists when built with [`StaticDevices::all`].
#[derive(Debug, Default)]
pub struct StaticDevices {
    devices: Option<HashSet<String>>,
}

impl StaticDevices {
    pub fn all() -> Self {
        Self { devices: None }
    }

    pub fn only<I, S>(devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            devices: Some(devices.into_iter().map(Into::into).collect()),
        }
    }
}

impl HostDevices for StaticDevices {
    fn exists(&self, device: &str) -> bool {
        self.devices
            .as_ref()
            .map_or(true, |devices| devices.contains(device))
    }
}

/// Picks the device name for the `index`-th port (1-based) with `lanes`.
pub fn device_name(config: &SaisimConfig, index: u32, lanes: &[u32]) -> SaiResult<String> {
    match config.port_naming {
        PortNaming::Sequential => Ok(format!("{}{}", config.device_prefix, index)),
        PortNaming::Lanes => lanes
            .first()
            .map(|lane| format!("{}{}", config.device_prefix, lane))
            .ok_or_else(|| SaiError::invalid_argument("port has no hardware lanes")),
        PortNaming::Map => config
            .port_map
            .iter()
            .find(|entry| entry.lanes == lanes)
            .map(|entry| entry.device.clone())
            .ok_or_else(|| {
                SaiError::invalid_argument(format!("no device mapped for lanes {:?}", lanes))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PortMapEntry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sequential() {
        let config = SaisimConfig::default();
        assert_eq!(device_name(&config, 3, &[9]).unwrap(), "eth3");
    }

    #[test]
    fn test_lanes() {
        let config = SaisimConfig {
            port_naming: PortNaming::Lanes,
            ..Default::default()
        };
        assert_eq!(device_name(&config, 1, &[5, 6]).unwrap(), "eth5");
        assert!(device_name(&config, 1, &[]).is_err());
    }

    #[test]
    fn test_map() {
        let config = SaisimConfig {
            port_naming: PortNaming::Map,
            port_map: vec![PortMapEntry {
                lanes: vec![1, 2],
                device: "swp1".to_string(),
            }],
            ..Default::default()
        };
        assert_eq!(device_name(&config, 1, &[1, 2]).unwrap(), "swp1");
        assert!(device_name(&config, 1, &[3]).is_err());
    }

    #[test]
    fn test_static_devices() {
        assert!(StaticDevices::all().exists("anything"));
        let devices = StaticDevices::only(["eth1"]);
        assert!(devices.exists("eth1"));
        assert!(!devices.exists("eth2"));
    }
}
