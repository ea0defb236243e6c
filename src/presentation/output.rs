//! Output Rendering
//!
//! Human-readable rendering of engine results. Everything here returns a
//! `String`; the binary decides where it goes. JSON output needs no renderer:
//! every result type is `Serialize`.

use std::fmt::Write as _;

use crossterm::style::{Color, Stylize};

use crate::domain::entities::{
    SlotAvailability, SlotPool, ValidationEntry, ValidationResult, ValidationStatus,
};
use crate::domain::services::{
    AssignOutcome, BatchProfile, PortIssue, PortSummary, SlotIntegrityReport,
};

/// Icons for output rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
    warn: &'static str,
    note: &'static str,
    arrow: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            warn: "⚠",
            note: "○",
            arrow: "↳",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            warn: "[WARN]",
            note: "[ ]",
            arrow: "->",
        }
    }
}

/// Text renderer for engine results
pub struct TextRenderer {
    /// Whether to use colors
    pub color: bool,
    /// Whether to use unicode
    pub unicode: bool,
    /// Verbosity level; details and info entries show from 1
    pub verbose: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            color: true,
            unicode: true,
            verbose: 0,
        }
    }
}

impl TextRenderer {
    /// Plain text, no colors; what tests and pipes see
    pub fn plain() -> Self {
        Self {
            color: false,
            unicode: true,
            verbose: 0,
        }
    }

    fn icons(&self) -> Icons {
        if self.unicode {
            Icons::unicode()
        } else {
            Icons::ascii()
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            format!("{}", text.with(color))
        } else {
            text.to_string()
        }
    }

    pub fn validation(&self, component_type: &str, uuid: &str, result: &ValidationResult) -> String {
        let icons = self.icons();
        let mut out = String::new();

        let headline = match result.status {
            ValidationStatus::Allowed => {
                self.paint(&format!("{} Allowed", icons.check), Color::Green)
            }
            ValidationStatus::AllowedWithWarnings => self.paint(
                &format!("{} Allowed with warnings", icons.warn),
                Color::Yellow,
            ),
            ValidationStatus::Blocked => {
                self.paint(&format!("{} Blocked", icons.cross), Color::Red)
            }
        };
        let _ = writeln!(out, "{}: {} {}", headline, component_type, uuid);

        self.section(&mut out, "Errors", icons.cross, Color::Red, &result.errors);
        self.section(&mut out, "Warnings", icons.warn, Color::Yellow, &result.warnings);
        if self.verbose > 0 {
            self.section(&mut out, "Info", icons.note, Color::Cyan, &result.info);
        }
        out
    }

    fn section(
        &self,
        out: &mut String,
        title: &str,
        icon: &str,
        color: Color,
        entries: &[ValidationEntry],
    ) {
        if entries.is_empty() {
            return;
        }
        let arrow = self.icons().arrow;
        let _ = writeln!(out);
        let _ = writeln!(out, "  {} ({}):", title, entries.len());
        for entry in entries {
            let _ = writeln!(
                out,
                "    {} [{}] {}",
                self.paint(icon, color),
                entry.kind,
                entry.message
            );
            if let Some(resolution) = &entry.resolution {
                let _ = writeln!(out, "      {} {}", arrow, resolution);
            }
            if self.verbose > 0 {
                if let Some(details) = &entry.details {
                    let _ = writeln!(out, "      {} {}", arrow, details);
                }
            }
        }
    }

    pub fn slots(&self, pool: SlotPool, availability: &SlotAvailability) -> String {
        let title = match pool {
            SlotPool::Pcie => "PCIe slots",
            SlotPool::Riser => "Riser slots",
        };
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {} total, {} used, {} free",
            title,
            availability.total_slots(),
            availability.used_slots(),
            availability.available_slots()
        );
        for (size, total) in &availability.total {
            let free = availability.available_of(*size);
            let _ = writeln!(out, "  {:<4} {} of {} free", size.as_str(), free, total);
        }
        out
    }

    pub fn slot_report(&self, report: &SlotIntegrityReport) -> String {
        let icons = self.icons();
        let mut out = String::new();
        let pool = match report.pool {
            SlotPool::Pcie => "PCIe",
            SlotPool::Riser => "Riser",
        };
        if report.is_valid() {
            let line = format!(
                "{} {} assignments valid ({} of {} slots used)",
                icons.check, pool, report.consumers, report.total_slots
            );
            let _ = writeln!(out, "{}", self.paint(&line, Color::Green));
            return out;
        }

        let line = format!("{} {} assignment problems ({})", icons.cross, pool, report.issues.len());
        let _ = writeln!(out, "{}", self.paint(&line, Color::Red));
        for issue in &report.issues {
            let _ = writeln!(out, "    {} {}", icons.arrow, issue.message);
        }
        out
    }

    pub fn ports(&self, summary: &PortSummary, issues: &[PortIssue]) -> String {
        let icons = self.icons();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Ports: {} total, {} used, {} free",
            summary.total_ports, summary.used_ports, summary.available_ports
        );
        for nic in &summary.nics {
            let free: Vec<String> = nic.available_ports.iter().map(|p| p.to_string()).collect();
            let _ = writeln!(
                out,
                "  {} ({} {}): {}/{} used, free [{}]",
                nic.nic_id,
                nic.port_type,
                format_speed(nic.max_speed_mbps),
                nic.utilization.used,
                nic.utilization.total,
                free.join(", ")
            );
        }
        if !issues.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "  Problems ({}):", issues.len());
            for issue in issues {
                let _ = writeln!(out, "    {} {}", self.paint(icons.cross, Color::Red), issue.message);
            }
        }
        out
    }

    pub fn batch(&self, profile: &BatchProfile) -> String {
        let line = format!(
            "{} {} x {} at {}",
            self.icons().check,
            profile.count,
            profile.module_type,
            format_speed(profile.speed_mbps)
        );
        format!("{}\n", self.paint(&line, Color::Green))
    }

    pub fn assign_outcome(&self, outcome: &AssignOutcome) -> String {
        let icons = self.icons();
        let mut out = String::new();
        match outcome {
            AssignOutcome::Assigned { nic_id, placements } => {
                let line = format!("{} {} module(s) placed on {}", icons.check, placements.len(), nic_id);
                let _ = writeln!(out, "{}", self.paint(&line, Color::Green));
                for p in placements {
                    let _ = writeln!(out, "    {} port {}: {}", icons.arrow, p.port_index, p.module_uuid);
                }
            }
            AssignOutcome::Incompatible { nic_id, reason } => {
                let line = format!("{} {} cannot take these modules: {}", icons.cross, nic_id, reason);
                let _ = writeln!(out, "{}", self.paint(&line, Color::Red));
            }
            AssignOutcome::Insufficient {
                nic_id,
                needed,
                available,
                alternatives,
            } => {
                let line = format!(
                    "{} {} has {} free port(s), {} needed",
                    icons.warn, nic_id, available, needed
                );
                let _ = writeln!(out, "{}", self.paint(&line, Color::Yellow));
                for alt in alternatives {
                    let _ = writeln!(
                        out,
                        "    {} try {} ({} ports, {} {})",
                        icons.arrow,
                        alt.nic_id,
                        alt.ports,
                        alt.port_type,
                        format_speed(alt.max_speed_mbps)
                    );
                }
            }
        }
        out
    }
}

/// `25G`, `100M`, or `unknown speed`
pub fn format_speed(mbps: Option<u32>) -> String {
    match mbps {
        Some(m) if m >= 1000 && m % 1000 == 0 => format!("{}G", m / 1000),
        Some(m) if m >= 1000 => format!("{:.1}G", f64::from(m) / 1000.0),
        Some(m) => format!("{}M", m),
        None => "unknown speed".to_string(),
    }
}
