//! Text rendering of shares and billed reports.

use std::fmt::Write;

use crate::allocation::{Allocation, Charge, Interval};
use crate::day::Day;
use crate::document::BillDefinition;
use crate::money::coerce_to_nearest;
use crate::roster::Roster;

/// Everything a shares report shows.
pub(crate) struct SharesReport<'a> {
    pub bill: &'a BillDefinition,
    pub roster: &'a Roster,
    pub start: Day,
    pub end: Day,
    pub amount: f64,
    pub intervals: &'a [Interval],
    /// Missing when the bill's mode is unknown; only the header is rendered.
    pub allocation: Option<&'a Allocation>,
}

impl SharesReport<'_> {
    pub fn render(&self) -> String {
        let mut output = String::new();
        let amount = coerce_to_nearest(self.amount);

        writeln!(
            output,
            "{} bill: {}~{}({}d) {amount}",
            self.bill.description,
            self.start,
            self.end,
            self.start.days_through(self.end)
        )
        .unwrap();

        let Some(allocation) = self.allocation else {
            return output;
        };
        let mode = allocation.mode;

        for interval in self.intervals {
            let present = &interval.snapshot.members;
            let names: Vec<&str> = if mode.lists_families() {
                self.roster.families_in_order(present).collect()
            } else {
                self.roster.members_in_order(present).collect()
            };
            let listing = if names.is_empty() {
                "nobody".to_string()
            } else {
                names.join(", ")
            };
            writeln!(output, "{}: {listing}", interval.head()).unwrap();
        }

        let rate = coerce_to_nearest(allocation.rate);
        let elide = mode.elides_unit_count();
        writeln!(
            output,
            "{} {}: ${amount}/({})=${rate}",
            self.bill.description,
            mode.label(),
            allocation.total.render(elide)
        )
        .unwrap();

        for charge in &allocation.charges {
            writeln!(
                output,
                "{}: ${rate}*({})=${}",
                charge.family,
                charge.units.render(elide),
                coerce_to_nearest(charge.owed)
            )
            .unwrap();
        }

        output
    }
}

/// Fills the bill's template with one line per charged family.
///
/// Each family contributes its own template with `${owes}` replaced; the bill
/// template then receives `${amount}` and the joined lines as `${content}`.
/// Without a bill template the report is empty.
pub(crate) fn render_billed(
    bill: &BillDefinition,
    roster: &Roster,
    charges: &[Charge],
    amount: f64,
) -> String {
    let Some(outer) = bill
        .template
        .as_ref()
        .and_then(|t| t.select(&bill.description))
    else {
        return String::new();
    };

    let mut content = String::new();
    for charge in charges {
        let line = roster
            .family(&charge.family)
            .and_then(|f| f.template.as_ref())
            .and_then(|t| t.select(&bill.description));
        let Some(line) = line else {
            tracing::warn!(
                family = %charge.family,
                bill = %bill.description,
                "family has no template for this bill, leaving it out of the billed report"
            );
            continue;
        };
        content.push_str(&line.replace("${owes}", &coerce_to_nearest(charge.owed)));
        content.push('\n');
    }

    outer
        .replace("${amount}", &coerce_to_nearest(amount))
        .replace("${content}", &content)
}
