use anyhow::{bail, Result};
use rackfit::domain::services::AssignOutcome;
use rackfit::Engine;

use crate::ui::{json, output::renderer};

pub fn cmd_check(engine: &Engine, build_id: &str, as_json: bool, verbose: u8) -> Result<bool> {
    let profile = engine.validate_unassigned_modules(build_id)?;

    if as_json {
        json::complete("transceivers.check", &profile)?;
    } else {
        print!("{}", renderer(verbose).batch(&profile));
    }
    Ok(true)
}

pub fn cmd_assign(
    engine: &Engine,
    build_id: &str,
    nic: Option<&str>,
    as_json: bool,
    verbose: u8,
) -> Result<bool> {
    let nic_id = match nic {
        Some(id) => id.to_string(),
        None => match engine.choose_optimal_nic(build_id)? {
            Some(best) => best.nic_id,
            None => bail!("no NIC in build '{}' can take its unassigned transceivers", build_id),
        },
    };

    let outcome = engine.auto_assign(build_id, &nic_id)?;
    if as_json {
        json::complete("transceivers.assign", &outcome)?;
    } else {
        print!("{}", renderer(verbose).assign_outcome(&outcome));
    }
    Ok(matches!(outcome, AssignOutcome::Assigned { .. }))
}
