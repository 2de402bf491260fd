//! Core domain logic for splitting shared-residence bills.
//!
//! This crate contains:
//! - Occupancy: replaying move-in/move-out/skip activities into a timeline
//! - Allocation: partitioning a billing period and splitting an amount by mode
//! - Reports: the human-readable shares ledger and template-based billed text

mod allocation;
mod biller;
pub mod day;
pub mod document;
mod error;
pub mod mode;
pub mod money;
mod occupancy;
mod report;
mod roster;

pub use allocation::{
    Allocation, Charge, FamilyShare, Interval, ShareTerm, ShareUnits, Shares, compute_intervals,
};
pub use biller::{BillOutcome, BillRequest, Biller};
pub use day::{Day, InvalidDay};
pub use document::{ActionCode, BillDefinition, Document, Template};
pub use error::{BuildError, ComputeError, ConfigError};
pub use mode::{AllocationMode, UnknownMode};
pub use money::coerce_to_nearest;
pub use occupancy::{Action, EventLog, Snapshot, Timeline};
pub use roster::{Family, Roster};
