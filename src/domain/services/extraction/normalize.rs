//! Pure normalizers for loosely formatted spec strings
//!
//! Every function here is total: any input yields a value, never a panic.
//! Unknown input maps to a sentinel (`0`, `None`, `Unknown`, `Other`) or to
//! a documented default wrapped in `Extracted::Defaulted`.

use crate::domain::value_objects::{
    DriveFormFactor, Extracted, PortType, SlotSize, StorageInterface, StorageProtocol,
};

/// Lane count assumed when a card's PCIe width cannot be read.
///
/// Permissive on purpose: an unknown card is treated as a full x16 device, so
/// lane and slot checks err towards "needs more" rather than silently fitting.
pub const DEFAULT_PCIE_LANES: u8 = 16;

/// Decimal numbers appearing in `s`, in order ("PCIe 4.0 x16" → [4.0, 16.0])
pub(crate) fn numbers(s: &str) -> Vec<f64> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() || (c == '.' && !current.is_empty() && !current.contains('.')) {
            current.push(c);
        } else if !current.is_empty() {
            push_number(&mut out, &current);
            current.clear();
        }
    }
    if !current.is_empty() {
        push_number(&mut out, &current);
    }
    out
}

fn push_number(out: &mut Vec<f64>, text: &str) {
    if let Ok(n) = text.trim_end_matches('.').parse::<f64>() {
        out.push(n);
    }
}

/// Uppercase with whitespace, `-` and `_` removed
fn compact_upper(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Integer following `keyword` in `haystack`, skipping separators.
fn number_after(haystack: &str, keyword: &str) -> Option<u32> {
    let start = haystack.find(keyword)? + keyword.len();
    let digits: String = haystack[start..]
        .chars()
        .skip_while(|c| c.is_whitespace() || *c == '-' || *c == '_' || *c == '.')
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Roman-numeral generation marker following `keyword` ("sata iii" → 3)
fn roman_after(haystack: &str, keyword: &str) -> Option<u8> {
    let start = haystack.find(keyword)? + keyword.len();
    let token: String = haystack[start..]
        .chars()
        .skip_while(|c| c.is_whitespace() || *c == '-' || *c == '_')
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    match token.to_ascii_lowercase().as_str() {
        "i" => Some(1),
        "ii" => Some(2),
        "iii" => Some(3),
        "iv" => Some(4),
        _ => None,
    }
}

// === Memory ===

/// Canonical memory type: speed suffix stripped, uppercased.
///
/// `"DDR5-4800"` → `"DDR5"`, `"ddr4 3200"` → `"DDR4"`,
/// `"Registered DDR4 ECC"` → `"DDR4"`. Empty input yields an empty string.
pub fn normalize_memory_type(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let tokens: Vec<&str> = upper
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == '/')
        .filter(|t| !t.is_empty())
        .collect();
    tokens
        .iter()
        .find(|t| t.contains("DDR"))
        .or_else(|| tokens.first())
        .map(|t| t.to_string())
        .unwrap_or_default()
}

/// DDR generation number, 0 when undetectable (`"DDR5-4800"` → 5)
pub fn memory_generation(raw: &str) -> u8 {
    let normalized = normalize_memory_type(raw);
    number_after(&normalized, "DDR")
        .and_then(|g| u8::try_from(g).ok())
        .unwrap_or(0)
}

/// Speed embedded in a memory type string (`"DDR5-4800"` → 4800)
pub fn memory_speed_from_type(raw: &str) -> Option<u32> {
    let upper = raw.to_uppercase();
    let rest = match upper.find("DDR") {
        Some(idx) => {
            let after = &upper[idx + 3..];
            // skip the generation digit(s)
            after.trim_start_matches(|c: char| c.is_ascii_digit())
        }
        None => upper.as_str(),
    };
    numbers(rest)
        .into_iter()
        .find(|n| *n >= 100.0)
        .map(|n| n as u32)
}

/// Memory frequency in MHz (`"4800MHz"`, `"4800 MT/s"`, `"DDR5-4800"`, `"3.2GHz"`)
pub fn parse_frequency_mhz(raw: &str) -> Option<u32> {
    let upper = raw.to_uppercase();
    if upper.contains("DDR") {
        return memory_speed_from_type(&upper);
    }
    let first = numbers(&upper).into_iter().next()?;
    if upper.contains("GHZ") {
        return Some((first * 1000.0).round() as u32);
    }
    (first >= 1.0).then_some(first.round() as u32)
}

/// Capacity in GB (`"2TB"` → 2048, `"512 GB"` → 512, `"16384MB"` → 16)
pub fn parse_capacity_gb(raw: &str) -> Option<u64> {
    let upper = raw.to_uppercase();
    let value = numbers(&upper).into_iter().next()?;
    let gb = if upper.contains("TB") {
        value * 1024.0
    } else if upper.contains("MB") {
        value / 1024.0
    } else {
        value
    };
    Some(gb.round() as u64)
}

// === Network ===

/// Line rate in Mbps (`"25GbE"` → 25000, `"1000Mbps"` → 1000, `"10G"` → 10000).
///
/// A bare number up to 800 is read as Gbps, larger bare numbers as Mbps.
pub fn parse_speed_mbps(raw: &str) -> Option<u32> {
    let upper = raw.to_uppercase();
    let value = numbers(&upper).into_iter().next()?;
    let mbps = if upper.contains("MB") || upper.contains("MBPS") {
        value
    } else if upper.contains('G') || value <= 800.0 {
        value * 1000.0
    } else {
        value
    };
    (mbps >= 1.0).then_some(mbps.round() as u32)
}

/// Canonical port / module form factor
pub fn normalize_port_type(raw: &str) -> PortType {
    let compact = compact_upper(raw);
    match compact.as_str() {
        "SFP" | "SFP1G" => PortType::Sfp,
        "SFP+" | "SFPPLUS" | "SFP10G" => PortType::SfpPlus,
        "SFP28" => PortType::Sfp28,
        "SFP56" => PortType::Sfp56,
        "QSFP" | "QSFP+" | "QSFPPLUS" => PortType::QsfpPlus,
        "QSFP28" => PortType::Qsfp28,
        "QSFP56" => PortType::Qsfp56,
        "QSFPDD" => PortType::QsfpDd,
        "RJ45" | "COPPER" => PortType::Rj45,
        other if other.contains("BASET") => PortType::Rj45,
        _ => PortType::Other(raw.trim().to_string()),
    }
}

// === PCIe ===

/// PCIe generation (`"PCIe 4.0"` → 4, `"Gen5"` → 5, `"4"` → 4)
pub fn extract_pcie_generation(raw: &str) -> Option<u8> {
    let upper = raw.to_uppercase();
    let generation = if let Some(g) = number_after(&upper, "GEN") {
        Some(g)
    } else if let Some(idx) = upper.find("PCIE") {
        leading_number_not_width(&upper[idx + 4..])
    } else {
        leading_number_not_width(&upper)
    };
    generation
        .filter(|g| (1..=7).contains(g))
        .and_then(|g| u8::try_from(g).ok())
}

/// First number in `s` that is not a link width (`x16`)
fn leading_number_not_width(s: &str) -> Option<u32> {
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let preceded_by_x = i > 0 && chars[i - 1] == 'X';
            let digits: String = chars[i..]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if !preceded_by_x {
                return digits.parse().ok();
            }
            i += digits.len();
        } else {
            i += 1;
        }
    }
    None
}

/// Link width from strings like `"x8"`, `"PCIe 4.0 x16"` or `"8"`.
///
/// Falls back to `Extracted::Defaulted(DEFAULT_PCIE_LANES)` when nothing
/// sensible can be read.
pub fn extract_pcie_lanes(raw: &str) -> Extracted<u8> {
    match parse_link_width(raw) {
        Some(lanes) => Extracted::Parsed(lanes),
        None => Extracted::Defaulted(DEFAULT_PCIE_LANES),
    }
}

fn parse_link_width(raw: &str) -> Option<u8> {
    let upper = raw.trim().to_uppercase();
    let chars: Vec<char> = upper.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if *c != 'X' {
            continue;
        }
        let standalone = i == 0 || !chars[i - 1].is_ascii_alphanumeric();
        if !standalone {
            continue;
        }
        let digits: String = chars[i + 1..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(lanes) = digits.parse::<u8>() {
            if (1..=32).contains(&lanes) {
                return Some(lanes);
            }
        }
    }
    upper
        .parse::<u8>()
        .ok()
        .filter(|lanes| (1..=32).contains(lanes))
}

/// Physical slot class from a width string; same fallback as lanes
pub fn extract_slot_size(raw: &str) -> Extracted<SlotSize> {
    extract_pcie_lanes(raw).map(SlotSize::from_lanes)
}

// === Sockets and form factors ===

/// Canonical socket string: uppercase, whitespace/`-`/`_` removed, a leading
/// `SOCKET` word dropped (`"Socket LGA 1700"` → `"LGA1700"`).
pub fn normalize_socket(raw: &str) -> String {
    let compact = compact_upper(raw);
    match compact.strip_prefix("SOCKET") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => compact,
    }
}

/// Socket equality after normalization; empty sockets never match
pub fn sockets_match(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_socket(a), normalize_socket(b));
    !a.is_empty() && a == b
}

/// Canonical board form factor (`"E-ATX"` → `"EATX"`, `"mATX"` → `"MICROATX"`)
pub fn normalize_board_form_factor(raw: &str) -> String {
    let compact = compact_upper(raw);
    match compact.as_str() {
        "MATX" | "UATX" | "µATX" | "ΜATX" => "MICROATX".to_string(),
        "EXTENDEDATX" => "EATX".to_string(),
        "SSIEEB" => "EEB".to_string(),
        _ => compact,
    }
}

/// Canonical DIMM form factor (`"SO-DIMM"` → `"SODIMM"`)
pub fn normalize_dimm_form_factor(raw: &str) -> String {
    compact_upper(raw)
}

/// Canonical drive form factor
pub fn normalize_drive_form_factor(raw: &str) -> DriveFormFactor {
    let lower = raw.trim().to_lowercase();
    if lower.contains("m.2") || lower.starts_with("m2") {
        DriveFormFactor::M2
    } else if lower.contains("u.2") || lower.contains("u.3") || lower.starts_with("u2") {
        DriveFormFactor::U2
    } else if lower.contains("2.5") || lower.contains("sff") {
        DriveFormFactor::Inch25
    } else if lower.contains("3.5") || lower.contains("lff") {
        DriveFormFactor::Inch35
    } else {
        DriveFormFactor::Other(raw.trim().to_string())
    }
}

// === Storage ===

/// Protocol and generation of a storage interface string.
///
/// `"SATA III"` → sata/3, `"SAS3"` → sas/3, `"SAS-4 24Gb/s"` → sas/4,
/// `"NVMe PCIe 4.0"` → nvme/4, `"12Gb/s SAS"` → sas/3.
pub fn normalize_storage_interface(raw: &str) -> StorageInterface {
    let lower = raw.trim().to_lowercase();
    let protocol = if lower.contains("nvme") {
        StorageProtocol::Nvme
    } else if lower.contains("sas") {
        StorageProtocol::Sas
    } else if lower.contains("sata") {
        StorageProtocol::Sata
    } else if lower.contains("pcie") {
        StorageProtocol::Nvme
    } else {
        StorageProtocol::Unknown
    };

    let generation = match protocol {
        StorageProtocol::Nvme if lower.contains("pcie") || lower.contains("gen") => {
            extract_pcie_generation(&lower).unwrap_or(0)
        }
        StorageProtocol::Nvme => 0,
        StorageProtocol::Sata => keyword_generation(&lower, "sata")
            .or_else(|| line_rate_generation(&lower, &[(6.0, 3), (3.0, 2), (1.5, 1)]))
            .unwrap_or(0),
        StorageProtocol::Sas => keyword_generation(&lower, "sas")
            .or_else(|| line_rate_generation(&lower, &[(24.0, 4), (22.5, 4), (12.0, 3), (6.0, 2), (3.0, 1)]))
            .unwrap_or(0),
        StorageProtocol::Unknown => 0,
    };

    StorageInterface::new(protocol, generation)
}

fn keyword_generation(lower: &str, keyword: &str) -> Option<u8> {
    number_after(lower, keyword)
        .filter(|g| (1..=5).contains(g))
        .and_then(|g| u8::try_from(g).ok())
        .or_else(|| roman_after(lower, keyword))
}

fn line_rate_generation(lower: &str, table: &[(f64, u8)]) -> Option<u8> {
    if !lower.contains("gb") && !lower.contains('g') {
        return None;
    }
    let rate = numbers(lower).into_iter().next()?;
    table
        .iter()
        .find(|(r, _)| (rate - r).abs() < f64::EPSILON)
        .map(|(_, generation)| *generation)
}
