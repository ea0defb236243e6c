//! Domain Policies
//!
//! Business rules shared by several validators.

mod lane_budget;

pub use lane_budget::{LaneBudget, LaneCheck};
