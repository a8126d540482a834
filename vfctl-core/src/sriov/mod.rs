//! SR-IOV virtual function management.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       SriovManager                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  max_vf_count() / enabled_vf_count() / set_vf_count()       │
//! │  enable_sriov() / disable_sriov() - guarded by device check │
//! │  list_vf_dirs() / vf_netdev_name() / vf_pci_address()       │
//! │  bind_vf() / unbind_vf() - PF driver bind/unbind files      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SysfsLayout  - where the control files live                │
//! │  ControlFs    - how they are read and written (HostFs)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation is a single control file write. Nothing is retried or rolled
//! back, and nothing guards against other processes changing the same files.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vfctl_core::{SriovManager, SysfsLayout};
//!
//! let manager = SriovManager::new(SysfsLayout::default());
//! manager.enable_sriov("eth0")?;
//!
//! for vf in manager.virtual_functions("eth0")? {
//!     if let Some(address) = vf.pci_address {
//!         manager.unbind_vf("eth0", &address)?;
//!     }
//! }
//! ```

mod fs;
mod manager;

pub use fs::{ControlFs, HostFs};
pub use manager::{SriovManager, SriovStatus, VirtualFunction};
