//! Bill allocation.
//!
//! Splits a billing period into intervals of constant occupancy, then turns
//! those intervals into share units per family according to the bill's
//! [`AllocationMode`].
//!
//! # Share units
//!
//! | mode                 | total                                 | per family                         |
//! |----------------------|---------------------------------------|------------------------------------|
//! | `per-person-per-day` | sum of days x people present          | sum of days x family headcount     |
//! | `per-family-per-day` | sum of days x families present        | sum of days the family was present |
//! | `per-person`         | distinct people present in the period | the family's distinct people       |
//! | `per-family`         | distinct families present             | 1                                  |
//!
//! The rate is `amount / total`, each family owes `rate x its units`.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::day::Day;
use crate::mode::AllocationMode;
use crate::occupancy::{Snapshot, Timeline};
use crate::roster::Roster;

/// A maximal span of the period during which occupancy did not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: Day,
    pub end: Day,
    pub duration_days: i64,
    pub snapshot: Snapshot,
}

impl Interval {
    fn new(start: Day, end: Day, snapshot: Snapshot) -> Self {
        Self {
            start,
            end,
            duration_days: start.days_through(end),
            snapshot,
        }
    }

    /// Label such as `20220101(1d)` or `20220101~20220104(4d)`.
    pub fn head(&self) -> String {
        if self.duration_days == 1 {
            format!("{}(1d)", self.start)
        } else {
            format!("{}~{}({}d)", self.start, self.end, self.duration_days)
        }
    }
}

/// Partitions `[start, end]` (inclusive) into intervals of constant occupancy.
///
/// Days before the first snapshot count as vacant. `start` must not be after `end`.
pub fn compute_intervals(timeline: &Timeline, start: Day, end: Day) -> Vec<Interval> {
    let snapshots = timeline.snapshots();
    let snapshot_at = |index: Option<usize>| {
        index.map_or_else(|| Snapshot::vacant(Day::epoch()), |i| snapshots[i].clone())
    };

    let mut current = timeline.latest_at(start);
    let mut opened = start;
    let mut intervals = Vec::new();

    let first_change = current.map_or(0, |i| i + 1);
    for (index, next) in snapshots.iter().enumerate().skip(first_change) {
        if next.date > end {
            break;
        }
        intervals.push(Interval::new(opened, next.date.pred(), snapshot_at(current)));
        opened = next.date;
        current = Some(index);
    }
    intervals.push(Interval::new(opened, end, snapshot_at(current)));

    tracing::debug!(count = intervals.len(), %start, %end, "intervals computed");
    intervals
}

/// One `duration*count` term of a share expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShareTerm {
    pub duration_days: i64,
    pub count: usize,
}

/// Share units, either duration-weighted or a plain head count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareUnits {
    Weighted(Vec<ShareTerm>),
    Count(usize),
}

impl ShareUnits {
    /// Builds weighted units from every interval where `count` is nonzero.
    fn weighted(intervals: &[Interval], count: impl Fn(&Snapshot) -> usize) -> Self {
        Self::Weighted(
            intervals
                .iter()
                .filter_map(|interval| {
                    let n = count(&interval.snapshot);
                    (n > 0).then_some(ShareTerm {
                        duration_days: interval.duration_days,
                        count: n,
                    })
                })
                .collect(),
        )
    }

    /// Total number of units.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn value(&self) -> f64 {
        match self {
            Self::Weighted(terms) => terms
                .iter()
                .map(|t| t.duration_days * t.count as i64)
                .sum::<i64>() as f64,
            Self::Count(n) => *n as f64,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Weighted(terms) => terms.iter().all(|t| t.count == 0 || t.duration_days == 0),
            Self::Count(n) => *n == 0,
        }
    }

    /// Renders the expression, e.g. `4*2+5*4`, or `4+5*3` when eliding unit counts.
    pub fn render(&self, elide_unit_count: bool) -> String {
        match self {
            Self::Weighted(terms) => terms
                .iter()
                .filter(|t| t.count > 0)
                .map(|t| {
                    if elide_unit_count && t.count == 1 {
                        t.duration_days.to_string()
                    } else {
                        format!("{}*{}", t.duration_days, t.count)
                    }
                })
                .collect::<Vec<_>>()
                .join("+"),
            Self::Count(n) => n.to_string(),
        }
    }
}

/// Units owed by one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyShare {
    pub family: String,
    pub units: ShareUnits,
}

/// Share units for a whole period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shares {
    pub mode: AllocationMode,
    pub total: ShareUnits,
    /// Families with nonzero units, in roster order.
    pub families: Vec<FamilyShare>,
}

impl Shares {
    pub fn compute(mode: AllocationMode, roster: &Roster, intervals: &[Interval]) -> Self {
        let seen: BTreeSet<&str> = intervals
            .iter()
            .flat_map(|i| i.snapshot.members.iter().map(String::as_str))
            .collect();

        let families: Vec<FamilyShare> = roster
            .families()
            .iter()
            .filter_map(|family| {
                let name = family.name.as_str();
                let units = match mode {
                    AllocationMode::PerPersonPerDay => {
                        ShareUnits::weighted(intervals, |s| s.headcount_of(name))
                    }
                    AllocationMode::PerFamilyPerDay => ShareUnits::weighted(intervals, |s| {
                        usize::from(s.headcount_of(name) > 0)
                    }),
                    AllocationMode::PerPerson => ShareUnits::Count(
                        family
                            .members
                            .iter()
                            .filter(|m| seen.contains(m.as_str()))
                            .count(),
                    ),
                    AllocationMode::PerFamily => ShareUnits::Count(usize::from(
                        family.members.iter().any(|m| seen.contains(m.as_str())),
                    )),
                };
                (!units.is_zero()).then(|| FamilyShare {
                    family: family.name.clone(),
                    units,
                })
            })
            .collect();

        let total = match mode {
            AllocationMode::PerPersonPerDay => ShareUnits::weighted(intervals, Snapshot::headcount),
            AllocationMode::PerFamilyPerDay => {
                ShareUnits::weighted(intervals, Snapshot::occupied_families)
            }
            AllocationMode::PerPerson => ShareUnits::Count(seen.len()),
            AllocationMode::PerFamily => ShareUnits::Count(families.len()),
        };

        Self {
            mode,
            total,
            families,
        }
    }

    /// Divides `amount` by the total units and charges each family its part.
    pub fn allocate(self, amount: f64) -> Allocation {
        let rate = amount / self.total.value();
        let charges = self
            .families
            .into_iter()
            .map(|share| Charge {
                owed: rate * share.units.value(),
                family: share.family,
                units: share.units,
            })
            .collect();
        Allocation {
            mode: self.mode,
            total: self.total,
            rate,
            charges,
        }
    }
}

/// What one family owes for a bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charge {
    pub family: String,
    pub units: ShareUnits,
    pub owed: f64,
}

/// A bill amount split across families.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub mode: AllocationMode,
    pub total: ShareUnits,
    /// Amount per share unit.
    pub rate: f64,
    pub charges: Vec<Charge>,
}
