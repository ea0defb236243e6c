use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rackfit::SlotSize;

/// rackfit - component compatibility checks for server builds
#[derive(Parser, Debug)]
#[command(name = "rackfit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./rackfit.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Component catalog (JSON or YAML)
    #[arg(long, global = true, default_value = "catalog.yaml")]
    pub catalog: PathBuf,

    /// Build records (JSON)
    #[arg(long, global = true, default_value = "builds.json")]
    pub builds: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a component can be added to a build
    Validate {
        /// Component type (cpu, motherboard, ram, storage, nic, chassis, caddy, pciecard, hbacard, sfp)
        component_type: String,

        /// Catalog UUID of the component
        uuid: String,

        /// Build to add it to
        #[arg(short, long)]
        build: String,
    },

    /// Show slot availability
    Slots {
        #[arg(short, long)]
        build: String,

        /// Riser connectors instead of PCIe slots
        #[arg(long)]
        riser: bool,
    },

    /// Suggest a free slot for a card of the given size
    AssignSlot {
        #[arg(short, long)]
        build: String,

        /// Slot size the card needs (x1, x4, x8, x16)
        #[arg(short, long)]
        size: SlotSize,

        /// Riser connectors instead of PCIe slots
        #[arg(long)]
        riser: bool,
    },

    /// Audit recorded slot assignments
    CheckSlots {
        #[arg(short, long)]
        build: String,

        /// Riser connectors instead of PCIe slots
        #[arg(long)]
        riser: bool,
    },

    /// Show NIC port usage and assignment problems
    Ports {
        #[arg(short, long)]
        build: String,
    },

    /// Transceiver batch checks and placement
    Transceivers {
        #[command(subcommand)]
        action: TransceiverAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransceiverAction {
    /// Check that unassigned transceivers form one batch
    Check {
        #[arg(short, long)]
        build: String,
    },

    /// Place unassigned transceivers into a NIC
    Assign {
        #[arg(short, long)]
        build: String,

        /// Target NIC (default: the best fitting one)
        #[arg(long)]
        nic: Option<String>,
    },
}
