//! rackfit CLI - component compatibility checks for server builds
//!
//! Usage: rackfit [--catalog FILE] [--builds FILE] <COMMAND>
//!
//! Commands:
//!   validate      Check whether a component can be added to a build
//!   slots         Show PCIe or riser slot availability
//!   assign-slot   Suggest a free slot for a card
//!   check-slots   Audit recorded slot assignments
//!   ports         Show NIC port usage
//!   transceivers  Batch checks and port placement

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use rackfit::config::load_hierarchy;
use rackfit::presentation::create_engine;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands, TransceiverAction};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().ok();
    let (config, warnings) = load_hierarchy(cli.config.as_deref(), cwd.as_deref())?;
    rackfit::logging::init(&config.logging, cli.verbose);
    rackfit::logging::install_panic_hook();
    ui::output::print_config_warnings(&warnings);

    let engine = create_engine(&cli.catalog, &cli.builds, &config)?;
    let (json, verbose) = (cli.json, cli.verbose);

    match cli.command {
        Commands::Validate {
            component_type,
            uuid,
            build,
        } => commands::validate::cmd_validate(&engine, &component_type, &uuid, &build, json, verbose),
        Commands::Slots { build, riser } => {
            commands::slots::cmd_slots(&engine, &build, riser, json, verbose)
        }
        Commands::AssignSlot { build, size, riser } => {
            commands::slots::cmd_assign_slot(&engine, &build, size, riser, json)
        }
        Commands::CheckSlots { build, riser } => {
            commands::slots::cmd_check_slots(&engine, &build, riser, json, verbose)
        }
        Commands::Ports { build } => commands::ports::cmd_ports(&engine, &build, json, verbose),
        Commands::Transceivers { action } => match action {
            TransceiverAction::Check { build } => {
                commands::transceivers::cmd_check(&engine, &build, json, verbose)
            }
            TransceiverAction::Assign { build, nic } => {
                commands::transceivers::cmd_assign(&engine, &build, nic.as_deref(), json, verbose)
            }
        },
    }
}
