//! SR-IOV manager.
//!
//! Drives the sriov_* control files of a physical function and binds/unbinds its
//! virtual functions through the PF driver.

use crate::error::{Result, VfError};
use crate::paths::SysfsLayout;
use crate::sriov::fs::{ControlFs, HostFs};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Length of the `../` prefix on a `virtfnN` link target.
const VF_LINK_PREFIX_LEN: usize = 3;

/// VF counts of a physical function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SriovStatus {
    /// Maximum VFs the driver supports (0 means no SR-IOV)
    pub max_vfs: u32,
    /// VFs currently enabled
    pub enabled_vfs: u32,
}

impl SriovStatus {
    pub fn is_supported(&self) -> bool {
        self.max_vfs > 0
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled_vfs > 0
    }
}

/// One virtual function of a physical function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualFunction {
    /// Directory entry under the PF control directory (e.g., "virtfn0")
    pub entry: String,
    /// Network interface name of the VF, if it has one
    pub netdev: Option<String>,
    /// PCI address of the VF (e.g., "0000:01:00.1")
    pub pci_address: Option<String>,
}

impl VirtualFunction {
    /// Numeric suffix of the entry name (`virtfn3` -> 3).
    pub fn index(&self) -> Option<u32> {
        let digits = self.entry.trim_start_matches(|c: char| !c.is_ascii_digit());
        digits.parse().ok()
    }
}

/// Manages SR-IOV virtual functions of physical network devices.
#[derive(Debug, Clone, Default)]
pub struct SriovManager<F = HostFs> {
    layout: SysfsLayout,
    fs: F,
}

impl SriovManager<HostFs> {
    /// Create a manager over the host filesystem.
    pub fn new(layout: SysfsLayout) -> Self {
        Self { layout, fs: HostFs }
    }
}

impl<F: ControlFs> SriovManager<F> {
    /// Create a manager over a custom control file backend.
    pub fn with_fs(layout: SysfsLayout, fs: F) -> Self {
        Self { layout, fs }
    }

    pub fn layout(&self) -> &SysfsLayout {
        &self.layout
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    // --- VF counts ---

    /// Maximum number of VFs the device supports (`sriov_totalvfs`).
    pub fn max_vf_count(&self, device: &str) -> Result<u32> {
        let max_vfs = self.fs.read_int(&self.layout.max_vfs_path(device))?;
        debug!(device = %device, max_vfs, "Read max VF count");
        Ok(max_vfs)
    }

    /// Number of VFs currently enabled (`sriov_numvfs`).
    pub fn enabled_vf_count(&self, device: &str) -> Result<u32> {
        let enabled_vfs = self.fs.read_int(&self.layout.num_vfs_path(device))?;
        debug!(device = %device, enabled_vfs, "Read enabled VF count");
        Ok(enabled_vfs)
    }

    /// Request `count` VFs on the device.
    ///
    /// No local bound check is made; the driver rejects counts it cannot honor,
    /// which surfaces as a write error.
    #[instrument(skip(self))]
    pub fn set_vf_count(&self, device: &str, count: u32) -> Result<()> {
        self.fs.write_int(&self.layout.num_vfs_path(device), count)?;
        info!(device = %device, count, "Set VF count");
        Ok(())
    }

    pub fn status(&self, device: &str) -> Result<SriovStatus> {
        Ok(SriovStatus {
            max_vfs: self.max_vf_count(device)?,
            enabled_vfs: self.enabled_vf_count(device)?,
        })
    }

    // --- SR-IOV toggle ---

    /// Enable every VF the device supports.
    ///
    /// 1. The device control directory must exist (`DeviceNotFound`).
    /// 2. `sriov_totalvfs` is read; read errors propagate.
    /// 3. A max of zero means no SR-IOV (`SriovUnsupported`) and nothing is written.
    /// 4. Otherwise `sriov_numvfs` is set to the max.
    #[instrument(skip(self))]
    pub fn enable_sriov(&self, device: &str) -> Result<()> {
        self.ensure_device(device)?;

        let max_vfs = self.max_vf_count(device)?;
        if max_vfs == 0 {
            warn!(device = %device, "Device reports no virtual functions");
            return Err(VfError::SriovUnsupported { device: device.to_string() });
        }

        self.set_vf_count(device, max_vfs)
    }

    /// Disable SR-IOV by setting the VF count to zero.
    #[instrument(skip(self))]
    pub fn disable_sriov(&self, device: &str) -> Result<()> {
        self.ensure_device(device)?;
        self.set_vf_count(device, 0)
    }

    // --- VF enumeration ---

    /// `virtfn*` directories under the device control directory.
    ///
    /// An existing directory without VFs yields an empty list; a directory that
    /// cannot be listed is a `ListFailed` error.
    pub fn list_vf_dirs(&self, device: &str) -> Result<Vec<String>> {
        let vf_dirs = self.fs.list_with_prefix(
            &self.layout.device_dir(device),
            &self.layout.vf_prefix,
            true,
        )?;
        debug!(device = %device, vfs = ?vf_dirs, "Listed virtual functions");
        Ok(vf_dirs)
    }

    /// Network interface name of a VF.
    ///
    /// Returns the first entry under `<vf>/net`. `None` covers both "VF has no
    /// netdev" and "net directory unreadable"; the two are not distinguished.
    /// When several names exist only the first in listing order is returned.
    pub fn vf_netdev_name(&self, device: &str, vf_entry: &str) -> Option<String> {
        let net_dir = self.layout.vf_net_path(device, vf_entry);
        match self.fs.list_with_prefix(&net_dir, "", false) {
            Ok(names) => names.into_iter().next(),
            Err(e) => {
                debug!(device = %device, vf = %vf_entry, error = %e, "No netdev for VF");
                None
            }
        }
    }

    /// PCI address of a VF, from its `virtfnN -> ../<address>` link.
    ///
    /// `None` if the link cannot be read, its target is not UTF-8, or the target
    /// is too short to hold an address after the `../` prefix.
    pub fn vf_pci_address(&self, device: &str, vf_entry: &str) -> Option<String> {
        let link = self.layout.vf_path(device, vf_entry);
        let target = match self.fs.read_link(&link) {
            Ok(target) => target,
            Err(e) => {
                debug!(device = %device, vf = %vf_entry, error = %e, "Unreadable VF link");
                return None;
            }
        };

        // PCI addresses are ASCII; a non-UTF-8 target cannot hold one.
        let Some(target) = target.to_str() else {
            debug!(device = %device, vf = %vf_entry, target = ?target, "Non-UTF-8 VF link");
            return None;
        };
        if target.len() <= VF_LINK_PREFIX_LEN {
            return None;
        }
        target.get(VF_LINK_PREFIX_LEN..).map(str::to_string)
    }

    /// All VFs of a device with their netdev names and PCI addresses, in VF index order.
    pub fn virtual_functions(&self, device: &str) -> Result<Vec<VirtualFunction>> {
        let mut vfs: Vec<VirtualFunction> = self
            .list_vf_dirs(device)?
            .into_iter()
            .map(|entry| VirtualFunction {
                netdev: self.vf_netdev_name(device, &entry),
                pci_address: self.vf_pci_address(device, &entry),
                entry,
            })
            .collect();

        vfs.sort_by_key(|vf| (vf.index().unwrap_or(u32::MAX), vf.entry.clone()));
        Ok(vfs)
    }

    // --- VF binding ---

    /// Unbind a VF from the PF's driver.
    #[instrument(skip(self))]
    pub fn unbind_vf(&self, device: &str, pci_address: &str) -> Result<()> {
        self.fs.write_str(&self.layout.unbind_path(device), pci_address)?;
        info!(device = %device, address = %pci_address, "VF unbound from driver");
        Ok(())
    }

    /// Bind a VF to the PF's driver.
    #[instrument(skip(self))]
    pub fn bind_vf(&self, device: &str, pci_address: &str) -> Result<()> {
        self.fs.write_str(&self.layout.bind_path(device), pci_address)?;
        info!(device = %device, address = %pci_address, "VF bound to driver");
        Ok(())
    }

    // --- Private helpers ---

    fn ensure_device(&self, device: &str) -> Result<()> {
        let path = self.layout.device_dir(device);
        if !self.fs.dir_exists(&path) {
            return Err(VfError::DeviceNotFound { device: device.to_string(), path });
        }
        Ok(())
    }
}
