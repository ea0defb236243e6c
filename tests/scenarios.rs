//! Scenario tests for rackfit.
//!
//! Each scenario assembles a realistic build in an in-memory store and asks
//! the engine one question about it, the way a build-configurator service
//! would.
//!
//! Run with: cargo test --test scenarios

mod common;

#[path = "scenarios/compatibility.rs"]
mod compatibility;

#[path = "scenarios/slots.rs"]
mod slots;

#[path = "scenarios/transceivers.rs"]
mod transceivers;
