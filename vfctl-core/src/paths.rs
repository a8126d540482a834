//! Sysfs path layout for SR-IOV control files.
//!
//! Every control file this crate touches is resolved through [`SysfsLayout`] so
//! that the same code can run against `/sys` or against a fake tree in tests.
//!
//! ```text
//! <net_root>/<device>/device/
//! ├── sriov_totalvfs          max VF count (read-only)
//! ├── sriov_numvfs            enabled VF count (read-write)
//! ├── driver/bind             bind a PCI address to the PF driver
//! ├── driver/unbind           unbind a PCI address from the PF driver
//! └── virtfnN -> ../0000:01:00.N
//!     └── net/<vf netdev>
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default root of the network class in sysfs.
pub const SYSFS_NET_PATH: &str = "/sys/class/net";

/// Named path fragments for the SR-IOV control interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysfsLayout {
    pub net_root: PathBuf,
    pub device_dir: String,
    pub driver_dir: String,
    pub bind_file: String,
    pub unbind_file: String,
    pub max_vfs_file: String,
    pub num_vfs_file: String,
    pub vf_prefix: String,
    pub vf_net_dir: String,
}

impl Default for SysfsLayout {
    fn default() -> Self {
        Self {
            net_root: PathBuf::from(SYSFS_NET_PATH),
            device_dir: "device".to_string(),
            driver_dir: "driver".to_string(),
            bind_file: "bind".to_string(),
            unbind_file: "unbind".to_string(),
            max_vfs_file: "sriov_totalvfs".to_string(),
            num_vfs_file: "sriov_numvfs".to_string(),
            vf_prefix: "virtfn".to_string(),
            vf_net_dir: "net".to_string(),
        }
    }
}

impl SysfsLayout {
    /// Layout with the default fragments rooted somewhere other than `/sys/class/net`.
    pub fn with_net_root(net_root: impl Into<PathBuf>) -> Self {
        Self { net_root: net_root.into(), ..Self::default() }
    }

    /// Control directory of a network device: `<net_root>/<device>/device`.
    ///
    /// The name is not validated.
    pub fn device_dir(&self, device: &str) -> PathBuf {
        self.net_root.join(device).join(&self.device_dir)
    }

    pub fn max_vfs_path(&self, device: &str) -> PathBuf {
        self.device_dir(device).join(&self.max_vfs_file)
    }

    pub fn num_vfs_path(&self, device: &str) -> PathBuf {
        self.device_dir(device).join(&self.num_vfs_file)
    }

    pub fn bind_path(&self, device: &str) -> PathBuf {
        self.device_dir(device).join(&self.driver_dir).join(&self.bind_file)
    }

    pub fn unbind_path(&self, device: &str) -> PathBuf {
        self.device_dir(device).join(&self.driver_dir).join(&self.unbind_file)
    }

    /// The `virtfnN` link for one VF entry.
    pub fn vf_path(&self, device: &str, vf_entry: &str) -> PathBuf {
        self.device_dir(device).join(vf_entry)
    }

    /// Directory holding the netdev name(s) of one VF.
    pub fn vf_net_path(&self, device: &str, vf_entry: &str) -> PathBuf {
        self.vf_path(device, vf_entry).join(&self.vf_net_dir)
    }
}
