//! Error types for building a biller and computing bills.

use thiserror::Error;

use crate::day::{Day, InvalidDay};
use crate::document::ActionCode;

/// Inconsistencies between the roster and the activity log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A member is listed under more than one family.
    #[error("{member} belongs to multiple families ({first} and {second})")]
    DuplicateMember {
        member: String,
        first: String,
        second: String,
    },

    /// The same family name is declared twice.
    #[error("family {family} is declared more than once")]
    DuplicateFamily { family: String },

    /// A family without members.
    #[error("family {family} has no members")]
    EmptyFamily { family: String },

    /// An activity refers to someone outside the roster.
    #[error("activities[{date}].{member} does not belong to any family")]
    UnknownMember { date: Day, member: String },

    /// The activity log has two entries for the same date.
    #[error("activities[{date}] is listed more than once")]
    DuplicateDate { date: Day },
}

/// Errors raised while reconstructing occupancy from the activity log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Move-in for someone already present.
    #[error("activities[{date}].{member} was already there")]
    AlreadyPresent { date: Day, member: String },

    /// Move-out or skip for someone not present.
    #[error("activities[{date}].{member} was not previously there")]
    NotPresent { date: Day, member: String },

    /// Action code other than the integers -1, 0 and +1.
    #[error("activities[{date}].{member} has invalid action: {action}")]
    InvalidAction {
        date: Day,
        member: String,
        action: ActionCode,
    },
}

/// Errors from a single bill computation. The biller stays usable afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// The selector matched neither an index nor a description.
    #[error("cannot find bill under name {selector}")]
    UnknownBill { selector: String },

    #[error(transparent)]
    InvalidDate(#[from] InvalidDay),

    #[error("billing period {start}~{end} ends before it starts")]
    InvertedPeriod { start: Day, end: Day },

    /// No share units accrued, so there is nobody to divide the amount by.
    #[error("nobody was present during {start}~{end}")]
    NobodyPresent { start: Day, end: Day },
}
