//! `vfctl status|enable|disable|set-count` commands

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::warn;
use vfctl_core::{ControlFs, SriovManager};

/// Show VF counts for a device.
pub fn status(manager: &SriovManager, device: &str, json: bool) -> Result<()> {
    let status = manager
        .status(device)
        .with_context(|| format!("Failed to read SR-IOV status of {}", device))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let state = if !status.is_supported() {
        "unsupported".yellow()
    } else if status.is_enabled() {
        "enabled".green()
    } else {
        "disabled".normal()
    };

    println!("Device:      {}", device.bold());
    println!("SR-IOV:      {}", state);
    println!("Max VFs:     {}", status.max_vfs);
    println!("Enabled VFs: {}", status.enabled_vfs);

    Ok(())
}

/// Enable SR-IOV. The enable already succeeded once the write returns, so a
/// failed read-back of the VF count is only logged.
pub fn enable<F: ControlFs>(manager: &SriovManager<F>, device: &str) -> Result<()> {
    manager
        .enable_sriov(device)
        .with_context(|| format!("Failed to enable SR-IOV on {}", device))?;

    match manager.enabled_vf_count(device) {
        Ok(enabled) => {
            println!("{} SR-IOV enabled on {} ({} VFs)", "✓".green(), device, enabled)
        }
        Err(e) => {
            warn!(device = %device, error = %e, "SR-IOV enabled but VF count unreadable");
            println!("{} SR-IOV enabled on {}", "✓".green(), device);
        }
    }
    Ok(())
}

pub fn disable(manager: &SriovManager, device: &str) -> Result<()> {
    manager
        .disable_sriov(device)
        .with_context(|| format!("Failed to disable SR-IOV on {}", device))?;

    println!("{} SR-IOV disabled on {}", "✓".green(), device);
    Ok(())
}

pub fn set_count(manager: &SriovManager, device: &str, count: u32) -> Result<()> {
    manager
        .set_vf_count(device, count)
        .with_context(|| format!("Failed to set VF count of {} to {}", device, count))?;

    println!("{} {} VFs requested on {}", "✓".green(), count, device);
    Ok(())
}
