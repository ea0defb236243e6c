use anyhow::Result;
use rackfit::domain::entities::SlotPool;
use rackfit::{Engine, SlotSize};

use crate::ui::{json, output::renderer};

fn pool(riser: bool) -> SlotPool {
    if riser {
        SlotPool::Riser
    } else {
        SlotPool::Pcie
    }
}

pub fn cmd_slots(engine: &Engine, build_id: &str, riser: bool, as_json: bool, verbose: u8) -> Result<bool> {
    let availability = if riser {
        engine.riser_slot_availability(build_id)?
    } else {
        engine.slot_availability(build_id)?
    };

    if as_json {
        json::complete("slots", &availability)?;
    } else {
        print!("{}", renderer(verbose).slots(pool(riser), &availability));
    }
    Ok(true)
}

pub fn cmd_assign_slot(
    engine: &Engine,
    build_id: &str,
    size: SlotSize,
    riser: bool,
    as_json: bool,
) -> Result<bool> {
    let slot = if riser {
        engine.assign_riser_slot(build_id, size)?
    } else {
        engine.assign_slot(build_id, size)?
    };

    if as_json {
        json::complete(
            "assign-slot",
            serde_json::json!({ "size": size, "slot_id": slot }),
        )?;
    } else {
        match &slot {
            Some(id) => println!("{}", id),
            None => eprintln!("No free slot fits a {} card", size),
        }
    }
    Ok(slot.is_some())
}

pub fn cmd_check_slots(
    engine: &Engine,
    build_id: &str,
    riser: bool,
    as_json: bool,
    verbose: u8,
) -> Result<bool> {
    let report = if riser {
        engine.validate_all_riser_slots(build_id)?
    } else {
        engine.validate_all_slots(build_id)?
    };

    if as_json {
        json::complete("check-slots", &report)?;
    } else {
        print!("{}", renderer(verbose).slot_report(&report));
    }
    Ok(report.is_valid())
}
