//! Entry point tying occupancy reconstruction to bill computation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::allocation::{Allocation, Charge, Interval, Shares, compute_intervals};
use crate::day::Day;
use crate::document::{BillDefinition, Document};
use crate::error::{BuildError, ComputeError};
use crate::mode::AllocationMode;
use crate::occupancy::{EventLog, Timeline};
use crate::report::{SharesReport, render_billed};
use crate::roster::Roster;

/// Selectors that address a bill by its zero-based index.
static INDEX_SELECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)$").unwrap());

/// Parameters of a single bill computation.
#[derive(Debug, Clone, Copy)]
pub struct BillRequest<'a> {
    /// Bill index (`"0"`, `"1"`, ...) or description.
    pub selector: &'a str,
    /// First day of the period, `YYYYMMDD`, inclusive.
    pub start: &'a str,
    /// Last day of the period, `YYYYMMDD`, inclusive.
    pub end: &'a str,
    pub amount: f64,
}

/// Result of computing a bill.
#[derive(Debug, Clone)]
pub struct BillOutcome {
    pub bill: BillDefinition,
    pub start: Day,
    pub end: Day,
    pub amount: f64,
    pub intervals: Vec<Interval>,
    /// Missing when the bill's mode is unknown.
    pub allocation: Option<Allocation>,
    pub shares_report: String,
    /// Empty unless the bill has a template.
    pub billed_report: String,
}

impl BillOutcome {
    pub fn charges(&self) -> &[Charge] {
        self.allocation
            .as_ref()
            .map_or(&[][..], |a| a.charges.as_slice())
    }
}

/// Occupancy history plus bill definitions, ready to compute bills.
///
/// Construction validates the whole document; afterwards every computation
/// only reads, so one biller serves any number of bills.
#[derive(Debug, Clone)]
pub struct Biller {
    roster: Roster,
    timeline: Timeline,
    bills: Vec<BillDefinition>,
}

impl Biller {
    pub fn new(document: Document) -> Result<Self, BuildError> {
        let roster = Roster::from_entries(document.families)?;
        let log = EventLog::new(document.activities)?;
        let timeline = Timeline::reconstruct(&roster, &log)?;
        debug!(
            families = roster.families().len(),
            bills = document.bills.len(),
            "biller ready"
        );
        Ok(Self {
            roster,
            timeline,
            bills: document.bills,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn bills(&self) -> &[BillDefinition] {
        &self.bills
    }

    /// Finds a bill by index first, then by description.
    pub fn resolve_bill(&self, selector: &str) -> Result<&BillDefinition, ComputeError> {
        let found = if INDEX_SELECTOR_RE.is_match(selector) {
            selector.parse::<usize>().ok().and_then(|i| self.bills.get(i))
        } else {
            self.bills.iter().find(|b| b.description == selector)
        };
        found.ok_or_else(|| ComputeError::UnknownBill {
            selector: selector.to_string(),
        })
    }

    /// Splits `amount` for the selected bill over the requested period.
    pub fn compute(&self, request: &BillRequest<'_>) -> Result<BillOutcome, ComputeError> {
        let bill = self.resolve_bill(request.selector)?;
        let start: Day = request.start.parse()?;
        let end: Day = request.end.parse()?;
        if start > end {
            return Err(ComputeError::InvertedPeriod { start, end });
        }

        let intervals = compute_intervals(&self.timeline, start, end);
        let allocation = match bill.mode.parse::<AllocationMode>() {
            Ok(mode) => {
                let shares = Shares::compute(mode, &self.roster, &intervals);
                if shares.total.is_zero() {
                    return Err(ComputeError::NobodyPresent { start, end });
                }
                Some(shares.allocate(request.amount))
            }
            Err(err) => {
                warn!(bill = %bill.description, %err, "skipping allocation");
                None
            }
        };

        let shares_report = SharesReport {
            bill,
            roster: &self.roster,
            start,
            end,
            amount: request.amount,
            intervals: &intervals,
            allocation: allocation.as_ref(),
        }
        .render();
        let charges = allocation.as_ref().map_or(&[][..], |a| a.charges.as_slice());
        let billed_report = render_billed(bill, &self.roster, charges, request.amount);

        Ok(BillOutcome {
            bill: bill.clone(),
            start,
            end,
            amount: request.amount,
            intervals,
            allocation,
            shares_report,
            billed_report,
        })
    }
}
