use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vfctl_core::{Config, SriovManager};

mod commands;

#[derive(Parser)]
#[command(name = "vfctl")]
#[command(about = "SR-IOV virtual function management", long_about = None)]
struct Cli {
    /// Configuration file (default: $VFCTL_CONFIG or /etc/vfctl/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (overrides the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show max and enabled VF counts
    Status {
        /// Physical network device (e.g., "eth0")
        device: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Enable every VF the device supports
    Enable {
        /// Physical network device
        device: String,
    },

    /// Disable SR-IOV (set VF count to 0)
    Disable {
        /// Physical network device
        device: String,
    },

    /// Request a specific number of VFs
    SetCount {
        /// Physical network device
        device: String,

        /// Number of VFs
        count: u32,
    },

    /// List virtual functions
    List {
        /// Physical network device
        device: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Bind a VF to the physical device's driver
    Bind {
        /// Physical network device
        device: String,

        /// VF PCI address (e.g., "0000:01:00.1")
        pci_address: String,
    },

    /// Unbind a VF from the physical device's driver
    Unbind {
        /// Physical network device
        device: String,

        /// VF PCI address (e.g., "0000:01:00.1")
        pci_address: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    if let Err(e) = vfctl_core::init_observability(level) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    tracing::debug!(net_root = %config.layout.net_root.display(), "Configuration loaded");

    let manager = SriovManager::new(config.layout);

    match cli.command {
        Commands::Status { device, json } => commands::sriov::status(&manager, &device, json),
        Commands::Enable { device } => commands::sriov::enable(&manager, &device),
        Commands::Disable { device } => commands::sriov::disable(&manager, &device),
        Commands::SetCount { device, count } => {
            commands::sriov::set_count(&manager, &device, count)
        }
        Commands::List { device, json } => commands::vf::list(&manager, &device, json),
        Commands::Bind { device, pci_address } => {
            commands::vf::bind(&manager, &device, &pci_address)
        }
        Commands::Unbind { device, pci_address } => {
            commands::vf::unbind(&manager, &device, &pci_address)
        }
    }
}
