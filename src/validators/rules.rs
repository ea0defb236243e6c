//! Rules shared by several validators
//!
//! Each rule looks at one relationship (memory vs host, lanes vs budget,
//! card vs slots, drives vs bays) and records entries on a `ResultBuilder`.
//! Validators call them in both directions: a CPU checks the RAM already
//! installed, a RAM module checks the CPUs already installed.

use serde_json::json;

use super::base::{ResultBuilder, ValidationContext};
use crate::domain::entities::{
    ChassisSpec, ComponentSpec, CpuSpec, IssueKind, MotherboardSpec, PciCardSpec, RamSpec,
    ResolvedBuild, StorageSpec,
};
use crate::domain::policies::{LaneBudget, LaneCheck};
use crate::domain::services::extraction::sockets_match;
use crate::domain::services::{SlotError, SlotTracker};
use crate::domain::value_objects::{ComponentType, DriveFormFactor, StorageProtocol};

/// Memory limits of a CPU or a motherboard
pub(crate) struct MemoryHost<'a> {
    pub role: &'static str,
    pub label: &'a str,
    pub memory_types: &'a [String],
    pub max_memory_gb: Option<u64>,
    pub max_memory_mhz: Option<u32>,
}

impl<'a> MemoryHost<'a> {
    pub fn cpu(cpu: &'a CpuSpec) -> Self {
        Self {
            role: "CPU",
            label: cpu.model.as_deref().unwrap_or(&cpu.uuid),
            memory_types: &cpu.memory_types,
            max_memory_gb: cpu.max_memory_gb,
            max_memory_mhz: cpu.max_memory_mhz,
        }
    }

    pub fn board(board: &'a MotherboardSpec) -> Self {
        Self {
            role: "motherboard",
            label: board.model.as_deref().unwrap_or(&board.uuid),
            memory_types: &board.memory_types,
            max_memory_gb: board.max_memory_gb,
            max_memory_mhz: board.max_memory_mhz,
        }
    }
}

/// Installed memory, quantity-weighted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MemoryTotals {
    pub modules: u32,
    pub capacity_gb: u64,
    pub fastest_mhz: Option<u32>,
}

impl MemoryTotals {
    pub fn of(build: &ResolvedBuild) -> Self {
        let mut totals = MemoryTotals::default();
        for (component, spec) in build.resolved_of(ComponentType::Ram) {
            if let Some(ram) = spec.as_ram() {
                totals.add(ram, component.quantity);
            }
        }
        totals
    }

    pub fn add(&mut self, ram: &RamSpec, quantity: u32) {
        let quantity = quantity.max(1);
        self.modules = self.modules.saturating_add(quantity);
        self.capacity_gb = self
            .capacity_gb
            .saturating_add(ram.capacity_gb.unwrap_or(0).saturating_mul(u64::from(quantity)));
        if let Some(mhz) = ram.speed_mhz {
            self.fastest_mhz = Some(self.fastest_mhz.map_or(mhz, |f| f.max(mhz)));
        }
    }
}

/// Installed RAM modules with their specs
pub(crate) fn installed_ram(build: &ResolvedBuild) -> impl Iterator<Item = &RamSpec> {
    build
        .resolved_of(ComponentType::Ram)
        .filter_map(|(_, spec)| spec.as_ram())
}

pub(crate) fn installed_cpus(build: &ResolvedBuild) -> impl Iterator<Item = &CpuSpec> {
    build
        .resolved_of(ComponentType::Cpu)
        .filter_map(|(_, spec)| spec.as_cpu())
}

pub(crate) fn chassis(build: &ResolvedBuild) -> Option<&ChassisSpec> {
    build
        .resolved_of(ComponentType::Chassis)
        .find_map(|(_, spec)| spec.as_chassis())
}

pub(crate) fn memory_type(b: &mut ResultBuilder, host: &MemoryHost<'_>, ram: &RamSpec) {
    let Some(module_type) = ram.memory_type.as_deref() else {
        return;
    };
    if host.memory_types.is_empty() || host.memory_types.iter().any(|t| t == module_type) {
        return;
    }
    b.error(
        IssueKind::MemoryTypeIncompatible,
        format!(
            "{} {} supports {} memory; module {} is {}",
            host.role,
            host.label,
            host.memory_types.join("/"),
            ram.model.as_deref().unwrap_or(&ram.uuid),
            module_type
        ),
    )
    .details(json!({
        "module": ram.uuid,
        "memory_type": module_type,
        "supported": host.memory_types,
    }))
    .resolution(format!(
        "Use {} modules",
        host.memory_types.join(" or ")
    ));
}

pub(crate) fn memory_capacity(b: &mut ResultBuilder, host: &MemoryHost<'_>, total_gb: u64) {
    let Some(max_gb) = host.max_memory_gb else {
        return;
    };
    if total_gb <= max_gb {
        return;
    }
    b.error(
        IssueKind::MemoryCapacityExceeded,
        format!(
            "{} GB of memory exceeds the {} GB supported by {} {}",
            total_gb, max_gb, host.role, host.label
        ),
    )
    .details(json!({
        "total_gb": total_gb,
        "max_gb": max_gb,
        "excess_gb": total_gb - max_gb,
    }))
    .resolution(format!("Remove at least {} GB of memory", total_gb - max_gb));
}

/// Faster modules down-clock to the host limit; legal but worth a warning
pub(crate) fn memory_speed(b: &mut ResultBuilder, host: &MemoryHost<'_>, module_mhz: Option<u32>) {
    let (Some(module_mhz), Some(max_mhz)) = (module_mhz, host.max_memory_mhz) else {
        return;
    };
    if module_mhz <= max_mhz {
        return;
    }
    let slowdown = slowdown_percent(module_mhz, max_mhz);
    b.warning(
        IssueKind::MemorySpeedDowngrade,
        format!(
            "memory rated {} MHz will run at {} MHz on {} {} ({}% slower)",
            module_mhz, max_mhz, host.role, host.label, slowdown
        ),
    )
    .details(json!({
        "module_mhz": module_mhz,
        "max_mhz": max_mhz,
        "slowdown_percent": slowdown,
    }));
}

/// Percentage lost when `from` MHz runs at `to` MHz, one decimal
pub(crate) fn slowdown_percent(from: u32, to: u32) -> f64 {
    if from == 0 || to >= from {
        return 0.0;
    }
    let pct = f64::from(from - to) / f64::from(from) * 100.0;
    (pct * 10.0).round() / 10.0
}

/// ECC-required CPU against non-ECC modules
pub(crate) fn ecc_required<'r>(
    b: &mut ResultBuilder,
    ctx: &ValidationContext<'_>,
    cpu: &CpuSpec,
    modules: impl IntoIterator<Item = &'r RamSpec>,
) {
    if !cpu.ecc_required {
        return;
    }
    let label = cpu.model.as_deref().unwrap_or(&cpu.uuid);
    let offenders = modules.into_iter().filter(|ram| !ram.ecc);
    let limit = if ctx.config.report_all_ecc_offenders {
        usize::MAX
    } else {
        1
    };
    for ram in offenders.take(limit) {
        b.error(
            IssueKind::EccRequired,
            format!(
                "CPU {} requires ECC memory; module {} is non-ECC",
                label,
                ram.model.as_deref().unwrap_or(&ram.uuid)
            ),
        )
        .details(json!({ "module": ram.uuid }))
        .resolution("Replace non-ECC modules with ECC modules");
    }
}

pub(crate) fn socket(b: &mut ResultBuilder, cpu: &CpuSpec, board: &MotherboardSpec) {
    let (Some(cpu_socket), Some(board_socket)) = (cpu.socket.as_deref(), board.socket.as_deref())
    else {
        return;
    };
    if sockets_match(cpu_socket, board_socket) {
        return;
    }
    b.error(
        IssueKind::SocketMismatch,
        format!(
            "CPU socket {} does not match motherboard socket {}",
            cpu_socket, board_socket
        ),
    )
    .details(json!({
        "cpu": cpu.uuid,
        "cpu_socket": cpu_socket,
        "motherboard_socket": board_socket,
    }))
    .resolution(format!("Choose a {} CPU", board_socket));
}

/// `installed` CPUs already sit in the board's sockets
pub(crate) fn cpu_count(b: &mut ResultBuilder, board: &MotherboardSpec, installed: u32, adding: u32) {
    let max = board.max_cpus.max(1);
    if installed.saturating_add(adding) <= max {
        return;
    }
    b.error(
        IssueKind::CpuSocketLimitExceeded,
        format!(
            "motherboard supports {} CPU(s) and {} already installed",
            max, installed
        ),
    )
    .details(json!({ "current": installed, "max": max }))
    .resolution("Choose a multi-socket motherboard or remove a CPU");
}

/// Generation cap: a faster device runs at the slowest host generation
pub(crate) fn pcie_generation(b: &mut ResultBuilder, build: &ResolvedBuild, spec: &ComponentSpec) {
    let Some(device_gen) = spec.pcie_generation() else {
        return;
    };
    let board_gen = build.motherboard().and_then(|(_, mb)| mb.pcie_generation);
    let cpu_gen = installed_cpus(build).filter_map(|c| c.pcie_generation).min();
    let host_gen = match (board_gen, cpu_gen) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let Some(host_gen) = host_gen else {
        return;
    };
    if device_gen <= host_gen {
        return;
    }
    b.warning(
        IssueKind::PcieBandwidthLimited,
        format!(
            "{} is PCIe gen {} but the platform runs gen {}; bandwidth is capped",
            spec.label(),
            device_gen,
            host_gen
        ),
    )
    .details(json!({ "device_gen": device_gen, "platform_gen": host_gen }));
}

/// Lane budget of `build`; report an overrun and any assumed lane counts
pub(crate) fn lane_budget(b: &mut ResultBuilder, ctx: &ValidationContext<'_>, budget: &LaneBudget) {
    if let LaneCheck::Exceeded {
        required,
        available,
        deficit,
    } = budget.check()
    {
        b.error(
            IssueKind::PcieLanesExceeded,
            format!(
                "devices need {} PCIe lanes but the CPUs provide {} ({} short)",
                required, available, deficit
            ),
        )
        .details(json!({
            "required": required,
            "available": available,
            "deficit": deficit,
        }))
        .resolution("Use CPUs with more lanes or fewer PCIe devices");
    }

    if !budget.assumed.is_empty() {
        b.assumed_lanes(
            ctx.config,
            format!(
                "lane count unknown for {} device(s); assumed 16 lanes each",
                budget.assumed.len()
            ),
        )
        .details(json!({ "components": budget.assumed }));
    }
}

/// Find a PCIe slot for a (non-riser) card in the build as it stands.
///
/// A card whose width was never stated is placed as x16, and the guess is
/// reported whether or not a board is present.
pub(crate) fn card_placement(
    b: &mut ResultBuilder,
    ctx: &ValidationContext<'_>,
    card: &ComponentSpec,
) {
    let Some(requirement) = card.slot_requirement() else {
        return;
    };
    let size = requirement.value();
    if requirement.is_defaulted() {
        b.assumed_lanes(
            ctx.config,
            format!("slot width unknown for {}; assumed {}", card.uuid(), size),
        )
        .details(json!({ "components": [card.uuid()], "assumed_size": size }));
    }
    let build = ctx.build;
    match SlotTracker::new(build).assign_slot(size) {
        Err(SlotError::NoMotherboard) => {
            b.info(
                IssueKind::NoMotherboard,
                "no motherboard yet; slot placement will be checked when one is added",
            );
        }
        Ok(Some(slot_id)) => {
            b.info(
                IssueKind::SlotAssignment,
                format!("{} card fits slot {}", size, slot_id),
            )
            .details(json!({ "slot_id": slot_id, "required_size": size }));
        }
        Ok(None) => {
            let availability = SlotTracker::new(build).availability().unwrap_or_default();
            b.error(
                IssueKind::PcieSlotUnavailable,
                format!("no free PCIe slot of size {} or larger", size),
            )
            .details(json!({
                "required_size": size,
                "available": availability.available,
            }))
            .resolution("Free a slot, add a riser, or choose a narrower card");
        }
    }
}

/// Find a riser connector for a riser card
pub(crate) fn riser_placement(b: &mut ResultBuilder, build: &ResolvedBuild, riser: &PciCardSpec) {
    let board = match build.motherboard() {
        Some((_, board)) => board,
        None => {
            b.info(
                IssueKind::NoMotherboard,
                "no motherboard yet; riser placement will be checked when one is added",
            );
            return;
        }
    };
    if board.riser_slots.is_empty() {
        b.error(
            IssueKind::RiserUnsupported,
            format!(
                "motherboard {} has no riser connectors",
                board.model.as_deref().unwrap_or(&board.uuid)
            ),
        )
        .resolution("Choose a motherboard with riser slots");
        return;
    }
    match SlotTracker::new(build).assign_riser_slot(riser.slot_size.value()) {
        Ok(Some(slot_id)) => {
            b.info(
                IssueKind::SlotAssignment,
                format!("riser fits riser slot {}", slot_id),
            )
            .details(json!({ "slot_id": slot_id, "required_size": riser.slot_size.value() }));
        }
        Ok(None) | Err(SlotError::NoMotherboard) => {
            b.error(
                IssueKind::RiserSlotUnavailable,
                format!("no free riser slot of size {} or larger", riser.slot_size.value()),
            )
            .details(json!({ "required_size": riser.slot_size.value() }));
        }
    }
}

/// Non-riser add-in cards, quantity-weighted
pub(crate) fn expansion_cards(build: &ResolvedBuild) -> u32 {
    build
        .resolved()
        .filter(|(_, spec)| {
            spec.required_slot().is_some() && !spec.as_pci_card().is_some_and(|c| c.is_riser())
        })
        .map(|(c, _)| c.quantity.max(1))
        .sum()
}

/// Chassis brackets limit how many cards the build can hold
pub(crate) fn expansion_slots(b: &mut ResultBuilder, build: &ResolvedBuild) {
    let Some(limit) = chassis(build).and_then(|c| c.expansion_slots) else {
        return;
    };
    let cards = expansion_cards(build);
    if cards <= limit {
        return;
    }
    b.error(
        IssueKind::ExpansionSlotsExceeded,
        format!(
            "{} expansion cards but the chassis has {} expansion slots",
            cards, limit
        ),
    )
    .details(json!({ "cards": cards, "expansion_slots": limit }));
}

/// Installed drives of one form factor, quantity-weighted
pub(crate) fn drives_of(build: &ResolvedBuild, form_factor: &DriveFormFactor) -> u32 {
    build
        .resolved_of(ComponentType::Storage)
        .filter(|(_, spec)| {
            spec.as_storage()
                .is_some_and(|s| s.form_factor.as_ref() == Some(form_factor))
        })
        .map(|(c, _)| c.quantity.max(1))
        .sum()
}

/// Drive bay usage of a chassis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BayUsage {
    pub small_drives: u32,
    pub large_drives: u32,
    pub small_bays: u32,
    pub large_bays: u32,
    /// Caddies that adapt a 2.5-inch drive to a 3.5-inch bay
    pub adapters: u32,
}

impl BayUsage {
    pub fn of(chassis: &ChassisSpec, build: &ResolvedBuild) -> Self {
        let mut usage = BayUsage {
            small_bays: chassis.bays_of(&DriveFormFactor::Inch25),
            large_bays: chassis.bays_of(&DriveFormFactor::Inch35),
            ..BayUsage::default()
        };
        for (component, spec) in build.resolved() {
            let quantity = component.quantity.max(1);
            match spec {
                ComponentSpec::Storage(drive) => match drive.form_factor {
                    Some(DriveFormFactor::Inch25) => usage.small_drives += quantity,
                    Some(DriveFormFactor::Inch35) => usage.large_drives += quantity,
                    _ => {}
                },
                ComponentSpec::Caddy(caddy)
                    if caddy.drive_form_factor == Some(DriveFormFactor::Inch25)
                        && caddy.bay_form_factor == Some(DriveFormFactor::Inch35) =>
                {
                    usage.adapters += quantity;
                }
                _ => {}
            }
        }
        usage
    }

    /// 2.5-inch drives that have to borrow a 3.5-inch bay
    pub fn small_overflow(&self) -> u32 {
        self.small_drives.saturating_sub(self.small_bays)
    }

    pub fn large_bays_needed(&self) -> u32 {
        self.large_drives + self.small_overflow()
    }

    pub fn fits(&self) -> bool {
        self.large_bays_needed() <= self.large_bays
    }

    pub fn missing_caddies(&self) -> u32 {
        self.small_overflow().saturating_sub(self.adapters)
    }
}

/// Bay capacity and caddy needs of `build` inside `chassis`
pub(crate) fn drive_bays(b: &mut ResultBuilder, chassis: &ChassisSpec, build: &ResolvedBuild) {
    let usage = BayUsage::of(chassis, build);
    if usage.small_drives + usage.large_drives == 0 {
        return;
    }
    if !usage.fits() {
        b.error(
            IssueKind::DriveBaysExceeded,
            format!(
                "{} 2.5-inch and {} 3.5-inch drives do not fit {} 2.5-inch and {} 3.5-inch bays",
                usage.small_drives, usage.large_drives, usage.small_bays, usage.large_bays
            ),
        )
        .details(json!({
            "drives_2_5": usage.small_drives,
            "drives_3_5": usage.large_drives,
            "bays_2_5": usage.small_bays,
            "bays_3_5": usage.large_bays,
        }))
        .resolution("Choose a chassis with more drive bays");
        return;
    }
    if usage.missing_caddies() > 0 {
        b.warning(
            IssueKind::CaddyRequired,
            format!(
                "{} 2.5-inch drive(s) need a 3.5-inch bay caddy",
                usage.missing_caddies()
            ),
        )
        .details(json!({
            "needed": usage.small_overflow(),
            "installed": usage.adapters,
        }))
        .resolution("Add 2.5-inch to 3.5-inch caddies");
    }
}

/// Backplane must speak the drive's protocol (SAS backplanes carry SATA)
pub(crate) fn backplane(b: &mut ResultBuilder, chassis: &ChassisSpec, drive: &StorageSpec) {
    let protocol = drive.interface.protocol;
    let in_bay = drive
        .form_factor
        .as_ref()
        .is_some_and(|ff| ff.uses_drive_bay());
    if !in_bay
        || protocol == StorageProtocol::Unknown
        || chassis.backplane_protocols.is_empty()
        || chassis.backplane_protocols.iter().any(|p| p.can_host(protocol))
    {
        return;
    }
    let supported: Vec<String> = chassis
        .backplane_protocols
        .iter()
        .map(|p| p.to_string())
        .collect();
    b.error(
        IssueKind::InterfaceIncompatible,
        format!(
            "{} drive {} cannot connect to a {} backplane",
            protocol,
            drive.model.as_deref().unwrap_or(&drive.uuid),
            supported.join("/")
        ),
    )
    .details(json!({ "drive": drive.uuid, "protocol": protocol, "backplane": supported }));
}

/// Is there anything in the build that can drive `protocol` devices?
pub(crate) fn has_controller(build: &ResolvedBuild, protocol: StorageProtocol) -> bool {
    let board_ports = build.motherboard().is_some_and(|(_, mb)| match protocol {
        StorageProtocol::Sata => mb.sata_ports > 0 || mb.sas_ports > 0,
        StorageProtocol::Sas => mb.sas_ports > 0,
        StorageProtocol::Nvme | StorageProtocol::Unknown => true,
    });
    board_ports
        || build
            .resolved_of(ComponentType::Hba)
            .filter_map(|(_, spec)| spec.as_hba())
            .any(|hba| hba.hosts(protocol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slowdown_is_rounded_to_one_decimal() {
        assert_eq!(slowdown_percent(4800, 4400), 8.3);
        assert_eq!(slowdown_percent(3200, 3200), 0.0);
        assert_eq!(slowdown_percent(0, 100), 0.0);
    }

    #[test]
    fn bay_overflow_borrows_large_bays() {
        let usage = BayUsage {
            small_drives: 6,
            large_drives: 2,
            small_bays: 4,
            large_bays: 4,
            adapters: 1,
        };
        assert_eq!(usage.small_overflow(), 2);
        assert_eq!(usage.large_bays_needed(), 4);
        assert!(usage.fits());
        assert_eq!(usage.missing_caddies(), 1);
    }

    #[test]
    fn bay_overflow_beyond_large_bays_does_not_fit() {
        let usage = BayUsage {
            small_drives: 3,
            large_drives: 1,
            small_bays: 0,
            large_bays: 3,
            adapters: 3,
        };
        assert!(!usage.fits());
    }
}
