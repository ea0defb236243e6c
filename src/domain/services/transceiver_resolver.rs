//! Transceiver batch checks and port allocation
//!
//! A batch is a set of modules placed together. Batches must be
//! homogeneous (one normalized type, one speed); callers split mixed batches
//! before asking for placement.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::port_tracker::{check_module_fit, ModuleMismatch};
use crate::domain::entities::{NicSource, PortInventory, SfpSpec};
use crate::domain::value_objects::PortType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("no transceivers given")]
    Empty,

    #[error(
        "transceivers must share one type and speed; found types [{}] and speeds [{}]",
        join_types(.types),
        join_speeds(.speeds)
    )]
    Heterogeneous {
        types: Vec<PortType>,
        speeds: Vec<Option<u32>>,
    },
}

fn join_types(types: &[PortType]) -> String {
    types
        .iter()
        .map(|t| t.label().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_speeds(speeds: &[Option<u32>]) -> String {
    speeds
        .iter()
        .map(|s| match s {
            Some(mbps) => format!("{} Mbps", mbps),
            None => "unknown".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// What a homogeneous batch looks like
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProfile {
    pub module_type: PortType,
    pub speed_mbps: Option<u32>,
    pub count: u32,
}

impl BatchProfile {
    /// A representative module for compatibility checks
    fn sample(&self) -> SfpSpec {
        SfpSpec {
            uuid: String::new(),
            model: None,
            module_type: self.module_type.clone(),
            speed_mbps: self.speed_mbps,
        }
    }
}

/// Require one normalized type and one effective speed across the batch
pub fn validate_unassigned_modules(modules: &[SfpSpec]) -> Result<BatchProfile, BatchError> {
    let first = modules.first().ok_or(BatchError::Empty)?;

    let mut types: Vec<PortType> = Vec::new();
    let mut speeds: Vec<Option<u32>> = Vec::new();
    for module in modules {
        if !types.contains(&module.module_type) {
            types.push(module.module_type.clone());
        }
        let speed = module.effective_speed_mbps();
        if !speeds.contains(&speed) {
            speeds.push(speed);
        }
    }

    if types.len() > 1 || speeds.len() > 1 {
        return Err(BatchError::Heterogeneous { types, speeds });
    }

    Ok(BatchProfile {
        module_type: first.module_type.clone(),
        speed_mbps: first.effective_speed_mbps(),
        count: modules.len() as u32,
    })
}

/// One module placed into one port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub module_uuid: String,
    pub port_index: u8,
}

/// A card that could host the whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicSuggestion {
    pub nic_id: String,
    pub port_type: PortType,
    pub max_speed_mbps: Option<u32>,
    pub ports: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssignOutcome {
    Assigned {
        nic_id: String,
        placements: Vec<Placement>,
    },
    Incompatible {
        nic_id: String,
        reason: ModuleMismatch,
    },
    Insufficient {
        nic_id: String,
        needed: u32,
        available: u32,
        /// Best first: higher speed, then fewer ports
        alternatives: Vec<NicSuggestion>,
    },
}

/// Place a batch into the free ports of `nic`, lowest port first.
///
/// `alternatives` are candidate cards offered when `nic` runs out of ports;
/// only the ones that take the module type and have room for the whole
/// batch are returned.
pub fn auto_assign(
    nic: &PortInventory,
    modules: &[SfpSpec],
    alternatives: &[PortInventory],
) -> Result<AssignOutcome, BatchError> {
    let profile = validate_unassigned_modules(modules)?;
    let sample = profile.sample();

    if let Err(reason) = check_module_fit(&nic.port_type, nic.max_speed_mbps, &sample) {
        return Ok(AssignOutcome::Incompatible {
            nic_id: nic.nic_id.clone(),
            reason,
        });
    }

    let free = nic.available_ports();
    if free.len() < modules.len() {
        let mut ranked: Vec<&PortInventory> = alternatives
            .iter()
            .filter(|alt| alt.nic_id != nic.nic_id)
            .filter(|alt| fits_batch(alt, &sample, profile.count))
            .collect();
        ranked.sort_by_key(|alt| (Reverse(alt.max_speed_mbps), alt.total_ports));

        debug!(
            nic_id = %nic.nic_id,
            needed = modules.len(),
            free = free.len(),
            "not enough free ports"
        );
        return Ok(AssignOutcome::Insufficient {
            nic_id: nic.nic_id.clone(),
            needed: profile.count,
            available: free.len() as u32,
            alternatives: ranked.into_iter().map(suggestion).collect(),
        });
    }

    let placements = modules
        .iter()
        .zip(free)
        .map(|(module, port_index)| Placement {
            module_uuid: module.uuid.clone(),
            port_index,
        })
        .collect();
    Ok(AssignOutcome::Assigned {
        nic_id: nic.nic_id.clone(),
        placements,
    })
}

/// Pick the card that best hosts the batch among the ones already present.
///
/// Prefers higher port speed, then add-on cards over onboard ports, then
/// fewer total ports.
pub fn choose_optimal_nic<'c>(
    modules: &[SfpSpec],
    candidates: &'c [PortInventory],
) -> Result<Option<&'c PortInventory>, BatchError> {
    let profile = validate_unassigned_modules(modules)?;
    let sample = profile.sample();

    let best = candidates
        .iter()
        .filter(|c| fits_batch(c, &sample, profile.count))
        .min_by_key(|c| {
            (
                Reverse(c.max_speed_mbps),
                c.source == NicSource::Onboard,
                c.total_ports,
            )
        });
    Ok(best)
}

fn fits_batch(nic: &PortInventory, sample: &SfpSpec, count: u32) -> bool {
    check_module_fit(&nic.port_type, nic.max_speed_mbps, sample).is_ok()
        && nic.available_ports().len() as u32 >= count
}

fn suggestion(nic: &PortInventory) -> NicSuggestion {
    NicSuggestion {
        nic_id: nic.nic_id.clone(),
        port_type: nic.port_type.clone(),
        max_speed_mbps: nic.max_speed_mbps,
        ports: nic.total_ports,
    }
}
