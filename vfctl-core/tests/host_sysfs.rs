//! Tests against a fake sysfs tree on the real filesystem.
//!
//! The kernel side (VF creation on sriov_numvfs writes) is not simulated here;
//! these tests cover the HostFs plumbing end to end.

#![cfg(unix)]

use std::ffi::OsStr;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::symlink;
use std::path::Path;
use tempfile::TempDir;
use vfctl_core::{Config, SriovManager, SysfsLayout, VfError};

/// Lay out `<root>/<device>/device` with the usual control files.
fn fake_pf(root: &Path, device: &str, max_vfs: u32) -> SysfsLayout {
    let layout = SysfsLayout::with_net_root(root);
    let dev_dir = layout.device_dir(device);
    fs::create_dir_all(dev_dir.join("driver")).unwrap();
    fs::write(layout.max_vfs_path(device), format!("{}\n", max_vfs)).unwrap();
    fs::write(layout.num_vfs_path(device), "0\n").unwrap();
    fs::write(layout.bind_path(device), "").unwrap();
    fs::write(layout.unbind_path(device), "").unwrap();
    layout
}

/// Add `virtfnN -> ../<address>` with a netdev, the way the kernel lays it out.
fn fake_vf(root: &Path, layout: &SysfsLayout, device: &str, index: u32, address: &str) {
    let pci_dir = root.join(device).join(address);
    fs::create_dir_all(pci_dir.join("net").join(format!("{}v{}", device, index))).unwrap();
    symlink(format!("../{}", address), layout.vf_path(device, &format!("virtfn{}", index)))
        .unwrap();
}

#[test]
fn test_enable_and_disable_on_disk() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let layout = fake_pf(temp.path(), "eth0", 7);
    let manager = SriovManager::new(layout.clone());

    manager.enable_sriov("eth0").unwrap();
    assert_eq!(fs::read_to_string(layout.num_vfs_path("eth0")).unwrap(), "7");
    assert_eq!(manager.enabled_vf_count("eth0").unwrap(), 7);

    manager.disable_sriov("eth0").unwrap();
    assert_eq!(manager.enabled_vf_count("eth0").unwrap(), 0);
}

#[test]
fn test_unsupported_device_on_disk() {
    let temp = TempDir::new().unwrap();
    let layout = fake_pf(temp.path(), "eth0", 0);
    let manager = SriovManager::new(layout.clone());

    let err = manager.enable_sriov("eth0").unwrap_err();
    assert!(matches!(err, VfError::SriovUnsupported { .. }));
    assert_eq!(fs::read_to_string(layout.num_vfs_path("eth0")).unwrap(), "0\n");
}

#[test]
fn test_missing_device_on_disk() {
    let temp = TempDir::new().unwrap();
    let manager = SriovManager::new(SysfsLayout::with_net_root(temp.path()));

    assert!(matches!(manager.enable_sriov("eth3"), Err(VfError::DeviceNotFound { .. })));
    assert!(matches!(manager.disable_sriov("eth3"), Err(VfError::DeviceNotFound { .. })));
    assert!(manager.max_vf_count("eth3").unwrap_err().is_read_error());
    assert!(manager.list_vf_dirs("eth3").unwrap_err().is_list_error());
}

#[test]
fn test_enumerate_virtual_functions_on_disk() {
    let temp = TempDir::new().unwrap();
    let layout = fake_pf(temp.path(), "eth0", 4);
    fake_vf(temp.path(), &layout, "eth0", 0, "0000:3b:02.0");
    fake_vf(temp.path(), &layout, "eth0", 1, "0000:3b:02.1");

    let manager = SriovManager::new(layout);

    assert_eq!(manager.list_vf_dirs("eth0").unwrap(), vec!["virtfn0", "virtfn1"]);

    let vfs = manager.virtual_functions("eth0").unwrap();
    assert_eq!(vfs.len(), 2);
    assert_eq!(vfs[1].pci_address.as_deref(), Some("0000:3b:02.1"));
    assert_eq!(vfs[1].netdev.as_deref(), Some("eth0v1"));
}

#[test]
fn test_vf_pci_address_rejects_short_and_non_utf8_links() {
    let temp = TempDir::new().unwrap();
    let layout = fake_pf(temp.path(), "eth0", 4);
    symlink(OsStr::from_bytes(b"\xff\xff"), layout.vf_path("eth0", "virtfn0")).unwrap();
    symlink(OsStr::from_bytes(b"../\xff0000:01:00.1"), layout.vf_path("eth0", "virtfn1"))
        .unwrap();
    symlink("../", layout.vf_path("eth0", "virtfn2")).unwrap();
    symlink("../0000:01:00.4", layout.vf_path("eth0", "virtfn3")).unwrap();

    let manager = SriovManager::new(layout);

    assert_eq!(manager.vf_pci_address("eth0", "virtfn0"), None);
    assert_eq!(manager.vf_pci_address("eth0", "virtfn1"), None);
    assert_eq!(manager.vf_pci_address("eth0", "virtfn2"), None);
    assert_eq!(manager.vf_pci_address("eth0", "virtfn3").as_deref(), Some("0000:01:00.4"));
}

#[test]
fn test_bind_and_unbind_on_disk() {
    let temp = TempDir::new().unwrap();
    let layout = fake_pf(temp.path(), "eth0", 4);
    let manager = SriovManager::new(layout.clone());

    manager.unbind_vf("eth0", "0000:3b:02.1").unwrap();
    assert_eq!(fs::read_to_string(layout.unbind_path("eth0")).unwrap(), "0000:3b:02.1");

    manager.bind_vf("eth0", "0000:3b:02.1").unwrap();
    assert_eq!(fs::read_to_string(layout.bind_path("eth0")).unwrap(), "0000:3b:02.1");
}

#[test]
fn test_config_layout_drives_manager() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("net");
    fake_pf(&root, "ens1f0", 2);

    let config_path = temp.path().join("config.json");
    fs::write(
        &config_path,
        format!(r#"{{"log_level": "debug", "layout": {{"net_root": {:?}}}}}"#, root),
    )
    .unwrap();

    let config = Config::from_json(&fs::read_to_string(&config_path).unwrap()).unwrap();
    let manager = SriovManager::new(config.layout);
    assert_eq!(manager.max_vf_count("ens1f0").unwrap(), 2);
}
