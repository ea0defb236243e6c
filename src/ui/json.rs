use std::io::{self, Write};

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Convenience helper that writes to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

/// `{"command": .., "data": ..}` for one finished command
pub fn complete(command: &str, data: impl serde::Serialize) -> io::Result<()> {
    let data = serde_json::to_value(data).map_err(io::Error::other)?;
    emit(serde_json::json!({
        "event": "complete",
        "command": command,
        "data": data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_newline_terminated() {
        let mut buf = Vec::new();
        write_event(&mut buf, &serde_json::json!({"event": "complete"})).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"event\":\"complete\"}\n");
    }
}
