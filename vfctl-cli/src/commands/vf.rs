//! `vfctl list|bind|unbind` commands

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use vfctl_core::{is_valid_pci_address, SriovManager};

#[derive(Tabled)]
struct VfRow {
    #[tabled(rename = "VF")]
    entry: String,
    #[tabled(rename = "PCI ADDRESS")]
    pci_address: String,
    #[tabled(rename = "NETDEV")]
    netdev: String,
}

/// List virtual functions of a device.
pub fn list(manager: &SriovManager, device: &str, json: bool) -> Result<()> {
    let vfs = manager
        .virtual_functions(device)
        .with_context(|| format!("Failed to list virtual functions of {}", device))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vfs)?);
        return Ok(());
    }

    if vfs.is_empty() {
        println!("No virtual functions on {}", device);
        return Ok(());
    }

    let rows: Vec<VfRow> = vfs
        .into_iter()
        .map(|vf| VfRow {
            entry: vf.entry,
            pci_address: vf.pci_address.unwrap_or_else(|| "-".to_string()),
            netdev: vf.netdev.unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    let total = rows.len();

    let mut table = Table::new(rows);
    table.with(Style::modern());

    println!("{}", table);
    println!();
    println!("Total: {} VF(s)", total);

    Ok(())
}

pub fn bind(manager: &SriovManager, device: &str, pci_address: &str) -> Result<()> {
    check_address(pci_address)?;
    manager
        .bind_vf(device, pci_address)
        .with_context(|| format!("Failed to bind {} via {}", pci_address, device))?;

    println!("{} {} bound", "✓".green(), pci_address);
    Ok(())
}

pub fn unbind(manager: &SriovManager, device: &str, pci_address: &str) -> Result<()> {
    check_address(pci_address)?;
    manager
        .unbind_vf(device, pci_address)
        .with_context(|| format!("Failed to unbind {} via {}", pci_address, device))?;

    println!("{} {} unbound", "✓".green(), pci_address);
    Ok(())
}

fn check_address(pci_address: &str) -> Result<()> {
    if !is_valid_pci_address(pci_address) {
        bail!("Invalid PCI address format: {} (expected: 0000:01:00.1)", pci_address);
    }
    Ok(())
}
