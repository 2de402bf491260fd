//! Allocation modes and their canonical names.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How a bill is split between families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationMode {
    /// Each present person pays for each day they were present.
    PerPersonPerDay,
    /// Each present family pays for each day at least one member was present.
    PerFamilyPerDay,
    /// Each person present at any point in the period pays one share.
    PerPerson,
    /// Each family present at any point in the period pays one share.
    PerFamily,
}

impl AllocationMode {
    /// Canonical name used in bill definitions.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PerPersonPerDay => "per-person-per-day",
            Self::PerFamilyPerDay => "per-family-per-day",
            Self::PerPerson => "per-person",
            Self::PerFamily => "per-family",
        }
    }

    /// Label used in the summary line of a shares report.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PerPersonPerDay => "per person per day",
            Self::PerFamilyPerDay => "per family per day",
            Self::PerPerson => "per person",
            Self::PerFamily => "per family",
        }
    }

    /// Whether interval lines list families rather than persons.
    pub const fn lists_families(&self) -> bool {
        matches!(self, Self::PerFamilyPerDay | Self::PerFamily)
    }

    /// Whether `duration*1` share terms are shortened to `duration`.
    pub const fn elides_unit_count(&self) -> bool {
        self.lists_families()
    }
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-person-per-day" => Ok(Self::PerPersonPerDay),
            "per-family-per-day" => Ok(Self::PerFamilyPerDay),
            "per-person" => Ok(Self::PerPerson),
            "per-family" => Ok(Self::PerFamily),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl Serialize for AllocationMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Error type for unrecognized allocation mode strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}
