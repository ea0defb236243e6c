use anyhow::Result;
use rackfit::Engine;

use crate::ui::{json, output::renderer};

pub fn cmd_ports(engine: &Engine, build_id: &str, as_json: bool, verbose: u8) -> Result<bool> {
    let summary = engine.port_summary(build_id)?;
    let issues = engine.validate_port_assignments(build_id)?;

    if as_json {
        json::complete(
            "ports",
            serde_json::json!({ "summary": summary, "issues": issues }),
        )?;
    } else {
        print!("{}", renderer(verbose).ports(&summary, &issues));
    }
    Ok(issues.is_empty())
}
