//! vfctl Core Library
//!
//! SR-IOV virtual function management for Linux network devices through the
//! kernel's sysfs control files.

pub mod config;
pub mod error;
pub mod observability;
pub mod paths;
pub mod pci;
pub mod sriov;

// Re-export commonly used items
pub use config::Config;
pub use error::{Result, VfError};
pub use observability::init as init_observability;
pub use paths::SysfsLayout;
pub use pci::is_valid_pci_address;
pub use sriov::{ControlFs, HostFs, SriovManager, SriovStatus, VirtualFunction};
