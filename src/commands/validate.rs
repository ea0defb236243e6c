use anyhow::Result;
use rackfit::logging::log_result;
use rackfit::Engine;

use crate::ui::{json, output::renderer};

pub fn cmd_validate(
    engine: &Engine,
    component_type: &str,
    uuid: &str,
    build_id: &str,
    as_json: bool,
    verbose: u8,
) -> Result<bool> {
    let result = engine.validate(component_type, build_id, uuid, None);
    log_result(component_type, uuid, &result);

    if as_json {
        json::complete("validate", &result)?;
    } else {
        print!("{}", renderer(verbose).validation(component_type, uuid, &result));
    }
    Ok(result.is_allowed())
}
