//! Raw specification document → typed `ComponentSpec`
//!
//! Repository documents are loosely typed: the same attribute may be a
//! number or a string with units, flat or nested (`"socket"` vs
//! `"socket.type"`). This is the only place that walks raw maps; every
//! other layer sees typed specs.

use serde_json::Value;

use super::normalize::{
    extract_pcie_generation, extract_pcie_lanes, extract_slot_size, memory_generation,
    memory_speed_from_type, normalize_board_form_factor, normalize_dimm_form_factor,
    normalize_drive_form_factor, normalize_memory_type, normalize_port_type, normalize_socket,
    normalize_storage_interface, parse_capacity_gb, parse_frequency_mhz, parse_speed_mbps,
    DEFAULT_PCIE_LANES,
};
use super::SpecError;
use crate::domain::entities::{
    BayGroup, CaddySpec, ChassisSpec, ComponentSpec, CpuSpec, HbaSpec, MotherboardSpec, NicSpec,
    OnboardNic, PciCardKind, PciCardSpec, RamSpec, SfpSpec, SlotGroup, StorageSpec,
    MAX_SLOTS_PER_GROUP,
};
use crate::domain::value_objects::{ComponentType, Extracted, SlotSize, StorageProtocol};

/// Interpret a raw repository document as the spec of a `ty` component
pub fn parse_spec(ty: ComponentType, uuid: &str, doc: &Value) -> Result<ComponentSpec, SpecError> {
    if !doc.is_object() {
        return Err(SpecError::Malformed {
            uuid: uuid.to_string(),
            message: format!("expected an attribute map, found {}", value_kind(doc)),
        });
    }

    let fields = Fields { doc };
    let uuid = uuid.to_string();
    let model = fields.text(&["model", "name", "product_name"]);

    let spec = match ty {
        ComponentType::Cpu => ComponentSpec::Cpu(parse_cpu(&fields, uuid, model)),
        ComponentType::Motherboard => {
            ComponentSpec::Motherboard(parse_motherboard(&fields, uuid, model))
        }
        ComponentType::Ram => ComponentSpec::Ram(parse_ram(&fields, uuid, model)),
        ComponentType::Storage => ComponentSpec::Storage(StorageSpec {
            uuid,
            model,
            interface: fields
                .text(&["interface", "interface_type", "protocol"])
                .map(|s| normalize_storage_interface(&s))
                .unwrap_or_default(),
            form_factor: fields
                .text(&["form_factor", "size"])
                .map(|s| normalize_drive_form_factor(&s)),
            capacity_gb: fields.capacity_gb(&["capacity_gb", "capacity"]),
        }),
        ComponentType::Nic => ComponentSpec::Nic(parse_nic(&fields, uuid, model)),
        ComponentType::Chassis => ComponentSpec::Chassis(parse_chassis(&fields, uuid, model)),
        ComponentType::Caddy => ComponentSpec::Caddy(CaddySpec {
            uuid,
            model,
            drive_form_factor: fields
                .text(&["drive_form_factor", "drive_size", "form_factor"])
                .map(|s| normalize_drive_form_factor(&s)),
            bay_form_factor: fields
                .text(&["bay_form_factor", "bay_size", "fits_bay"])
                .map(|s| normalize_drive_form_factor(&s)),
        }),
        ComponentType::PciCard => ComponentSpec::PciCard(parse_pci_card(&fields, uuid, model)),
        ComponentType::Hba => ComponentSpec::Hba(parse_hba(&fields, uuid, model)),
        ComponentType::Sfp => ComponentSpec::Sfp(SfpSpec {
            uuid,
            model,
            module_type: normalize_port_type(
                &fields
                    .text(&["type", "module_type", "form_factor"])
                    .unwrap_or_default(),
            ),
            speed_mbps: fields.speed_mbps(&["speed", "data_rate"]),
        }),
    };
    check_slot_counts(spec.uuid(), &spec)?;
    Ok(spec)
}

fn parse_cpu(f: &Fields<'_>, uuid: String, model: Option<String>) -> CpuSpec {
    let raw_types = f.list(&["memory_types", "memory.types", "memory_type", "memory.type"]);
    let ecc_text = f.text(&["ecc", "memory.ecc"]).unwrap_or_default().to_lowercase();
    let ecc_required = f
        .flag(&["ecc_required", "memory.ecc_required"])
        .unwrap_or(ecc_text == "required");
    CpuSpec {
        uuid,
        model,
        socket: f.text(&["socket", "socket.type"]).map(|s| normalize_socket(&s)),
        memory_types: normalized_memory_types(&raw_types),
        max_memory_gb: f.capacity_gb(&[
            "max_memory_capacity",
            "max_memory_gb",
            "memory.max_capacity",
            "memory.max_capacity_gb",
        ]),
        max_memory_mhz: f
            .frequency_mhz(&[
                "max_memory_speed",
                "max_memory_mhz",
                "memory.max_frequency_mhz",
                "memory.max_speed",
            ])
            .or_else(|| max_embedded_speed(&raw_types)),
        ecc_required,
        ecc_supported: ecc_required
            || f
                .flag(&["ecc_support", "ecc_supported", "memory.ecc_support"])
                .unwrap_or(ecc_text == "supported"),
        pcie_lanes: f
            .uint(&["pcie_lanes", "pcie.lanes"])
            .and_then(|n| u16::try_from(n).ok()),
        pcie_generation: f.generation(&["pcie_generation", "pcie.generation", "pcie_version"]),
        cores: f.uint(&["cores", "core_count"]).and_then(|n| u32::try_from(n).ok()),
    }
}

fn parse_motherboard(f: &Fields<'_>, uuid: String, model: Option<String>) -> MotherboardSpec {
    let raw_types = f.list(&["memory_types", "memory.types", "memory_type", "memory.type"]);
    let (m2_slots, m2_protocols) = m2_connectors(f.get(&["m2_slots", "storage.m2_slots"]));
    MotherboardSpec {
        uuid,
        model,
        socket: f.text(&["socket", "socket.type"]).map(|s| normalize_socket(&s)),
        max_cpus: f
            .u32(&["max_cpus", "socket.count", "cpu_sockets", "socket_count"])
            .filter(|n| *n > 0)
            .unwrap_or(1),
        chipset: f.text(&["chipset"]),
        form_factor: f
            .text(&["form_factor"])
            .map(|s| normalize_board_form_factor(&s)),
        memory_types: normalized_memory_types(&raw_types),
        memory_slots: f.u32(&["memory_slots", "memory.slots", "dimm_slots"]),
        max_memory_gb: f.capacity_gb(&[
            "max_memory_capacity",
            "max_memory_gb",
            "memory.max_capacity",
            "memory.max_capacity_gb",
        ]),
        max_memory_mhz: f
            .frequency_mhz(&[
                "max_memory_speed",
                "max_memory_mhz",
                "memory.max_frequency_mhz",
                "memory.max_speed",
            ])
            .or_else(|| max_embedded_speed(&raw_types)),
        ecc_supported: f.flag(&["ecc_support", "ecc_supported", "memory.ecc_support"]),
        memory_form_factors: f
            .list(&["memory_form_factors", "memory.form_factors", "memory.form_factor"])
            .iter()
            .map(|s| normalize_dimm_form_factor(s))
            .collect(),
        pcie_generation: f.generation(&["pcie_generation", "pcie.generation", "pcie_version"]),
        pcie_slots: slot_groups(f.get(&["pcie_slots", "expansion_slots.pcie_slots"])),
        riser_slots: slot_groups(f.get(&["riser_slots", "expansion_slots.riser_slots"])),
        m2_slots,
        m2_protocols,
        u2_slots: f.u32(&["u2_slots", "storage.u2_slots"]).unwrap_or(0),
        sata_ports: f.u32(&["sata_ports", "storage.sata_ports"]).unwrap_or(0),
        sas_ports: f.u32(&["sas_ports", "storage.sas_ports"]).unwrap_or(0),
        onboard_nics: onboard_nics(f.get(&["onboard_nics", "networking.onboard_nics"])),
    }
}

fn parse_ram(f: &Fields<'_>, uuid: String, model: Option<String>) -> RamSpec {
    let raw_type = f.text(&["memory_type", "type"]);
    let ecc = match f.get(&["ecc", "ecc_support"]) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let lower = s.to_lowercase();
            (lower.contains("ecc") && !lower.contains("non")) || lower == "yes" || lower == "true"
        }
        _ => false,
    };
    RamSpec {
        uuid,
        model,
        memory_type: raw_type.as_deref().map(normalize_memory_type),
        generation: raw_type.as_deref().map(memory_generation).unwrap_or(0),
        capacity_gb: f.capacity_gb(&["capacity_gb", "capacity", "size"]),
        speed_mhz: f
            .frequency_mhz(&["speed_mhz", "frequency_mhz", "speed", "frequency"])
            .or_else(|| raw_type.as_deref().and_then(memory_speed_from_type)),
        ecc,
        form_factor: f
            .text(&["form_factor"])
            .map(|s| normalize_dimm_form_factor(&s)),
        module_type: f
            .text(&["module_type", "registered_type"])
            .map(|s| s.trim().to_uppercase()),
    }
}

fn parse_nic(f: &Fields<'_>, uuid: String, model: Option<String>) -> NicSpec {
    let (lanes, slot_size, pcie_generation) = pcie_link(f);
    NicSpec {
        uuid,
        model,
        ports: f
            .uint(&["ports", "port_count", "network.ports"])
            .and_then(|n| u8::try_from(n).ok())
            .unwrap_or(1),
        port_type: normalize_port_type(
            &f.text(&["port_type", "connector", "network.port_type"])
                .unwrap_or_default(),
        ),
        speed_mbps: f.speed_mbps(&["speed", "port_speed", "max_speed", "network.speed"]),
        lanes,
        slot_size,
        pcie_generation,
    }
}

fn parse_chassis(f: &Fields<'_>, uuid: String, model: Option<String>) -> ChassisSpec {
    let backplane = f
        .list(&[
            "backplane.interfaces",
            "backplane.protocols",
            "backplane_interfaces",
            "backplane",
        ])
        .iter()
        .map(|s| normalize_storage_interface(s).protocol)
        .filter(|p| *p != StorageProtocol::Unknown)
        .fold(Vec::new(), dedup_push);
    ChassisSpec {
        uuid,
        model,
        motherboard_form_factors: f
            .list(&[
                "motherboard_form_factors",
                "motherboard_compatibility",
                "form_factor_support",
            ])
            .iter()
            .map(|s| normalize_board_form_factor(s))
            .collect(),
        drive_bays: bay_groups(f.get(&["drive_bays", "bays", "storage.drive_bays"])),
        backplane_protocols: backplane,
        expansion_slots: f.u32(&["expansion_slots", "pcie_expansion_slots"]),
    }
}

fn parse_pci_card(f: &Fields<'_>, uuid: String, model: Option<String>) -> PciCardSpec {
    let subtype = f
        .text(&["subtype", "component_subtype", "category", "card_type"])
        .unwrap_or_default()
        .to_lowercase();
    let kind = if subtype.contains("riser") {
        PciCardKind::Riser
    } else if subtype.contains("gpu") || subtype.contains("graphics") {
        PciCardKind::Gpu
    } else {
        PciCardKind::Other
    };
    let (lanes, slot_size, pcie_generation) = pcie_link(f);
    PciCardSpec {
        uuid,
        model,
        kind,
        lanes,
        slot_size,
        pcie_generation,
        provides_slots: slot_groups(f.get(&["provides_slots", "riser_slots", "slots"])),
    }
}

fn parse_hba(f: &Fields<'_>, uuid: String, model: Option<String>) -> HbaSpec {
    let (lanes, slot_size, pcie_generation) = pcie_link(f);
    HbaSpec {
        uuid,
        model,
        lanes,
        slot_size,
        pcie_generation,
        protocols: f
            .list(&["protocols", "protocol", "supported_interfaces", "interfaces"])
            .iter()
            .map(|s| normalize_storage_interface(s).protocol)
            .filter(|p| *p != StorageProtocol::Unknown)
            .fold(Vec::new(), dedup_push),
        max_devices: f.u32(&["max_devices", "max_drives"]),
        internal_ports: f.u32(&["internal_ports", "ports"]),
    }
}

/// Lanes, slot class and generation of an add-in card.
///
/// Width comes from an explicit lane count, else from the interface string,
/// else the documented default. A slot class derived from a defaulted width
/// stays marked as defaulted.
fn pcie_link(f: &Fields<'_>) -> (Extracted<u8>, Extracted<SlotSize>, Option<u8>) {
    let interface = f.text(&["interface", "pcie_interface", "slot_type", "bus"]);
    let lanes = match f.uint(&["pcie_lanes", "lanes"]).and_then(|n| u8::try_from(n).ok()) {
        Some(n) if n > 0 => Extracted::Parsed(n),
        _ => interface
            .as_deref()
            .map(extract_pcie_lanes)
            .unwrap_or(Extracted::Defaulted(DEFAULT_PCIE_LANES)),
    };
    let slot_size = match f
        .text(&["slot_size", "form_factor_slot"])
        .map(|s| extract_slot_size(&s))
    {
        Some(Extracted::Parsed(size)) => Extracted::Parsed(size),
        _ => lanes.map(SlotSize::from_lanes),
    };
    let generation = f
        .generation(&["pcie_generation", "pcie_version"])
        .or_else(|| interface.as_deref().and_then(extract_pcie_generation));
    (lanes, slot_size, generation)
}

/// Reject slot counts no real board or riser has; each unit becomes a
/// tracked slot, so an absurd count would be materialized in memory.
fn check_slot_counts(uuid: &str, spec: &ComponentSpec) -> Result<(), SpecError> {
    let groups: Vec<(&str, &[SlotGroup])> = match spec {
        ComponentSpec::Motherboard(mb) => vec![
            ("pcie_slots", mb.pcie_slots.as_slice()),
            ("riser_slots", mb.riser_slots.as_slice()),
        ],
        ComponentSpec::PciCard(card) => vec![("provides_slots", card.provides_slots.as_slice())],
        _ => return Ok(()),
    };
    for (field, groups) in groups {
        let total = groups
            .iter()
            .fold(0u32, |acc, g| acc.saturating_add(g.count));
        if total > MAX_SLOTS_PER_GROUP {
            return Err(SpecError::Malformed {
                uuid: uuid.to_string(),
                message: format!(
                    "{} declares {} slots (at most {} supported)",
                    field, total, MAX_SLOTS_PER_GROUP
                ),
            });
        }
    }
    Ok(())
}

fn normalized_memory_types(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|s| normalize_memory_type(s))
        .filter(|s| !s.is_empty())
        .fold(Vec::new(), dedup_push)
}

fn max_embedded_speed(raw: &[String]) -> Option<u32> {
    raw.iter().filter_map(|s| memory_speed_from_type(s)).max()
}

fn dedup_push<T: PartialEq>(mut acc: Vec<T>, item: T) -> Vec<T> {
    if !acc.contains(&item) {
        acc.push(item);
    }
    acc
}

/// Slot groups from `[{"size": "x16", "count": 2}]` or `{"x16": 2, "x8": 1}`
fn slot_groups(value: Option<&Value>) -> Vec<SlotGroup> {
    let mut groups = Vec::new();
    match value {
        Some(Value::Array(items)) => {
            for item in items {
                let size_text = match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(_) => ["size", "type", "lanes", "width"]
                        .iter()
                        .find_map(|k| item.get(*k).and_then(scalar_text)),
                    _ => None,
                };
                let Some(size_text) = size_text else {
                    continue;
                };
                if let Extracted::Parsed(size) = extract_slot_size(&size_text) {
                    let count = item
                        .get("count")
                        .and_then(value_uint)
                        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
                        .unwrap_or(1);
                    groups.push(SlotGroup { size, count });
                }
            }
        }
        Some(Value::Object(map)) => {
            for (size_text, count) in map {
                if let (Extracted::Parsed(size), Some(count)) =
                    (extract_slot_size(size_text), value_uint(count))
                {
                    groups.push(SlotGroup {
                        size,
                        count: u32::try_from(count).unwrap_or(u32::MAX),
                    });
                }
            }
        }
        _ => {}
    }
    groups.retain(|g| g.count > 0);
    groups
}

/// Bay groups from `[{"size": "2.5-inch", "count": 8}]` or `{"3.5-inch": 4}`
fn bay_groups(value: Option<&Value>) -> Vec<BayGroup> {
    let mut groups = Vec::new();
    match value {
        Some(Value::Array(items)) => {
            for item in items {
                let size = ["size", "form_factor", "type"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(scalar_text));
                let count = item
                    .get("count")
                    .and_then(value_uint)
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(1);
                if let Some(size) = size {
                    groups.push(BayGroup {
                        form_factor: normalize_drive_form_factor(&size),
                        count,
                    });
                }
            }
        }
        Some(Value::Object(map)) => {
            for (size, count) in map {
                if let Some(count) = value_uint(count).and_then(|n| u32::try_from(n).ok()) {
                    groups.push(BayGroup {
                        form_factor: normalize_drive_form_factor(size),
                        count,
                    });
                }
            }
        }
        _ => {}
    }
    groups.retain(|g| g.count > 0);
    groups
}

/// M.2 connector count and supported protocols.
///
/// Accepts a plain count, `{"count": 2, "interfaces": ["NVMe"]}`, or a list
/// of such objects. Without protocol data NVMe is assumed.
fn m2_connectors(value: Option<&Value>) -> (u32, Vec<StorageProtocol>) {
    let items: Vec<&Value> = match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v) => vec![v],
        None => return (0, Vec::new()),
    };
    let mut count = 0u32;
    let mut protocols = Vec::new();
    for item in items {
        if let Some(n) = value_uint(item) {
            count = count.saturating_add(u32::try_from(n).unwrap_or(u32::MAX));
            continue;
        }
        count = count.saturating_add(
            item.get("count")
                .and_then(value_uint)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(1),
        );
        for key in ["interfaces", "interface", "protocols"] {
            for text in value_list(item.get(key)) {
                let protocol = normalize_storage_interface(&text).protocol;
                if protocol != StorageProtocol::Unknown && !protocols.contains(&protocol) {
                    protocols.push(protocol);
                }
            }
        }
    }
    if count > 0 && protocols.is_empty() {
        protocols.push(StorageProtocol::Nvme);
    }
    (count, protocols)
}

fn onboard_nics(value: Option<&Value>) -> Vec<OnboardNic> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| OnboardNic {
            ports: item
                .get("ports")
                .and_then(value_uint)
                .and_then(|n| u8::try_from(n).ok())
                .unwrap_or(1),
            port_type: normalize_port_type(
                &["port_type", "connector", "type"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(scalar_text))
                    .unwrap_or_default(),
            ),
            speed_mbps: item
                .get("speed")
                .and_then(scalar_text)
                .and_then(|s| parse_speed_mbps(&s)),
        })
        .collect()
}

// === raw value helpers ===

struct Fields<'a> {
    doc: &'a Value,
}

impl<'a> Fields<'a> {
    /// First present value among dotted paths
    fn get(&self, paths: &[&str]) -> Option<&'a Value> {
        paths.iter().find_map(|path| {
            let mut current = self.doc;
            for segment in path.split('.') {
                current = current.get(segment)?;
            }
            (!current.is_null()).then_some(current)
        })
    }

    fn text(&self, paths: &[&str]) -> Option<String> {
        paths
            .iter()
            .find_map(|p| self.get(&[p]).and_then(scalar_text))
            .filter(|s| !s.trim().is_empty())
    }

    fn uint(&self, paths: &[&str]) -> Option<u64> {
        paths.iter().find_map(|p| self.get(&[p]).and_then(value_uint))
    }

    fn u32(&self, paths: &[&str]) -> Option<u32> {
        self.uint(paths).and_then(|n| u32::try_from(n).ok())
    }

    fn flag(&self, paths: &[&str]) -> Option<bool> {
        paths.iter().find_map(|p| self.get(&[p]).and_then(value_flag))
    }

    fn list(&self, paths: &[&str]) -> Vec<String> {
        paths
            .iter()
            .map(|p| value_list(self.get(&[p])))
            .find(|l| !l.is_empty())
            .unwrap_or_default()
    }

    fn capacity_gb(&self, paths: &[&str]) -> Option<u64> {
        paths.iter().find_map(|p| match self.get(&[p])? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.round() as u64)),
            Value::String(s) => parse_capacity_gb(s),
            _ => None,
        })
    }

    fn frequency_mhz(&self, paths: &[&str]) -> Option<u32> {
        paths.iter().find_map(|p| match self.get(&[p])? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => parse_frequency_mhz(s),
            _ => None,
        })
    }

    fn speed_mbps(&self, paths: &[&str]) -> Option<u32> {
        paths
            .iter()
            .find_map(|p| self.get(&[p]).and_then(scalar_text))
            .and_then(|s| parse_speed_mbps(&s))
    }

    fn generation(&self, paths: &[&str]) -> Option<u8> {
        paths
            .iter()
            .find_map(|p| self.get(&[p]).and_then(scalar_text))
            .and_then(|s| extract_pcie_generation(&s))
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_uint(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_flag(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "required" | "supported" | "1" => Some(true),
            "false" | "no" | "none" | "unsupported" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Array of scalars, or one comma-separated string
fn value_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::value_objects::{DriveFormFactor, PortType};

    #[test]
    fn non_object_document_is_malformed() {
        let err = parse_spec(ComponentType::Cpu, "cpu-1", &json!("Xeon")).unwrap_err();
        assert!(matches!(err, SpecError::Malformed { ref uuid, .. } if uuid == "cpu-1"));
    }

    #[test]
    fn cpu_reads_nested_paths() {
        let doc = json!({
            "model": "Xeon Gold 6338",
            "socket": {"type": "Socket LGA4189"},
            "memory": {
                "types": ["DDR4-3200"],
                "max_capacity": "6 TB",
                "ecc_required": true
            },
            "pcie_lanes": 64,
            "pcie_generation": "PCIe 4.0"
        });
        let spec = parse_spec(ComponentType::Cpu, "cpu-1", &doc).unwrap();
        let cpu = spec.as_cpu().unwrap();
        assert_eq!(cpu.socket.as_deref(), Some("LGA4189"));
        assert_eq!(cpu.memory_types, vec!["DDR4".to_string()]);
        assert_eq!(cpu.max_memory_gb, Some(6144));
        assert_eq!(cpu.max_memory_mhz, Some(3200));
        assert!(cpu.ecc_required);
        assert!(cpu.ecc_supported);
        assert_eq!(cpu.pcie_lanes, Some(64));
        assert_eq!(cpu.pcie_generation, Some(4));
    }

    #[test]
    fn motherboard_slot_groups_accept_list_and_map() {
        let listed = json!({
            "socket": "LGA4189",
            "socket_count": 2,
            "pcie_slots": [{"size": "x16", "count": 2}, {"type": "PCIe x8", "count": 1}],
            "riser_slots": {"x16": 1},
            "m2_slots": {"count": 2, "interfaces": ["NVMe"]}
        });
        let spec = parse_spec(ComponentType::Motherboard, "mb-1", &listed).unwrap();
        let mb = spec.as_motherboard().unwrap();
        assert_eq!(mb.max_cpus, 2);
        assert_eq!(mb.total_pcie_slots(), 3);
        assert_eq!(mb.riser_slots, vec![SlotGroup { size: SlotSize::X16, count: 1 }]);
        assert_eq!(mb.m2_slots, 2);
        assert_eq!(mb.m2_protocols, vec![StorageProtocol::Nvme]);
    }

    #[test]
    fn absurd_slot_counts_are_malformed() {
        let doc = json!({"pcie_slots": {"x16": 3_000_000}});
        let err = parse_spec(ComponentType::Motherboard, "mb-huge", &doc).unwrap_err();
        assert!(matches!(err, SpecError::Malformed { ref uuid, .. } if uuid == "mb-huge"));
        assert!(err.to_string().contains("pcie_slots"));

        let listed = json!({"riser_slots": [{"size": "x16", "count": 99_999_999_999u64}]});
        assert!(parse_spec(ComponentType::Motherboard, "mb-huge", &listed).is_err());

        let riser = json!({"subtype": "riser", "provides_slots": {"x8": 65}});
        assert!(parse_spec(ComponentType::PciCard, "riser-huge", &riser).is_err());
    }

    #[test]
    fn slot_count_at_limit_is_accepted() {
        let doc = json!({"pcie_slots": {"x8": MAX_SLOTS_PER_GROUP}});
        let spec = parse_spec(ComponentType::Motherboard, "mb-1", &doc).unwrap();
        assert_eq!(spec.as_motherboard().unwrap().total_pcie_slots(), MAX_SLOTS_PER_GROUP);
    }

    #[test]
    fn motherboard_defaults_to_single_socket() {
        let spec = parse_spec(ComponentType::Motherboard, "mb-1", &json!({})).unwrap();
        let mb = spec.as_motherboard().unwrap();
        assert_eq!(mb.max_cpus, 1);
        assert!(mb.pcie_slots.is_empty());
        assert_eq!(mb.m2_slots, 0);
    }

    #[test]
    fn onboard_nics_are_parsed() {
        let doc = json!({
            "onboard_nics": [{"ports": 2, "port_type": "SFP28", "speed": "25GbE"}]
        });
        let spec = parse_spec(ComponentType::Motherboard, "mb-1", &doc).unwrap();
        let nics = &spec.as_motherboard().unwrap().onboard_nics;
        assert_eq!(nics.len(), 1);
        assert_eq!(nics[0].port_type, PortType::Sfp28);
        assert_eq!(nics[0].speed_mbps, Some(25_000));
    }

    #[test]
    fn nic_lane_count_defaults_when_interface_is_vague() {
        let doc = json!({"ports": 2, "port_type": "SFP+", "interface": "PCIe Gen3"});
        let spec = parse_spec(ComponentType::Nic, "nic-1", &doc).unwrap();
        let nic = spec.as_nic().unwrap();
        assert_eq!(nic.lanes, Extracted::Defaulted(16));
        assert_eq!(nic.slot_size, Extracted::Defaulted(SlotSize::X16));
        assert_eq!(nic.pcie_generation, Some(3));
    }

    #[test]
    fn nic_lane_count_from_interface() {
        let doc = json!({"ports": 4, "port_type": "SFP28", "interface": "PCIe 4.0 x8", "speed": "25G"});
        let spec = parse_spec(ComponentType::Nic, "nic-1", &doc).unwrap();
        let nic = spec.as_nic().unwrap();
        assert_eq!(nic.lanes, Extracted::Parsed(8));
        assert_eq!(nic.slot_size, Extracted::Parsed(SlotSize::X8));
        assert_eq!(nic.max_speed_mbps(), Some(25_000));
    }

    #[test]
    fn pci_card_subtype_detects_riser() {
        let doc = json!({
            "subtype": "Riser Card",
            "interface": "PCIe x16",
            "provides_slots": [{"size": "x8", "count": 2}]
        });
        let spec = parse_spec(ComponentType::PciCard, "riser-1", &doc).unwrap();
        let card = spec.as_pci_card().unwrap();
        assert!(card.is_riser());
        assert_eq!(card.provides_slots, vec![SlotGroup { size: SlotSize::X8, count: 2 }]);
        assert_eq!(spec.lane_demand(), None);
    }

    #[test]
    fn storage_interface_and_form_factor() {
        let doc = json!({"interface": "SAS 12Gb/s", "form_factor": "2.5 inch", "capacity": "1.92TB"});
        let spec = parse_spec(ComponentType::Storage, "ssd-1", &doc).unwrap();
        let s = spec.as_storage().unwrap();
        assert_eq!(s.interface.protocol, StorageProtocol::Sas);
        assert_eq!(s.form_factor, Some(DriveFormFactor::Inch25));
    }

    #[test]
    fn chassis_bays_and_backplane() {
        let doc = json!({
            "drive_bays": [{"size": "3.5\"", "count": 12}],
            "backplane": {"interfaces": ["SAS3", "SATA III"]},
            "motherboard_compatibility": ["E-ATX", "ATX"]
        });
        let spec = parse_spec(ComponentType::Chassis, "ch-1", &doc).unwrap();
        let ch = spec.as_chassis().unwrap();
        assert_eq!(ch.bays_of(&DriveFormFactor::Inch35), 12);
        assert_eq!(
            ch.backplane_protocols,
            vec![StorageProtocol::Sas, StorageProtocol::Sata]
        );
        assert_eq!(ch.motherboard_form_factors, vec!["EATX".to_string(), "ATX".to_string()]);
    }

    #[test]
    fn ram_type_embeds_speed() {
        let doc = json!({"memory_type": "DDR5-4800", "capacity": "32GB", "ecc": "ECC Registered", "module_type": "rdimm"});
        let spec = parse_spec(ComponentType::Ram, "ram-1", &doc).unwrap();
        let ram = spec.as_ram().unwrap();
        assert_eq!(ram.memory_type.as_deref(), Some("DDR5"));
        assert_eq!(ram.generation, 5);
        assert_eq!(ram.speed_mhz, Some(4800));
        assert_eq!(ram.capacity_gb, Some(32));
        assert!(ram.ecc);
        assert_eq!(ram.module_type.as_deref(), Some("RDIMM"));
    }

    #[test]
    fn ram_non_ecc_string() {
        let doc = json!({"memory_type": "DDR4", "ecc": "Non-ECC"});
        let spec = parse_spec(ComponentType::Ram, "ram-1", &doc).unwrap();
        assert!(!spec.as_ram().unwrap().ecc);
    }

    #[test]
    fn sfp_speed_falls_back_to_cage() {
        let doc = json!({"type": "SFP28"});
        let spec = parse_spec(ComponentType::Sfp, "sfp-1", &doc).unwrap();
        let sfp = spec.as_sfp().unwrap();
        assert_eq!(sfp.module_type, PortType::Sfp28);
        assert_eq!(sfp.effective_speed_mbps(), Some(25_000));
    }
}
