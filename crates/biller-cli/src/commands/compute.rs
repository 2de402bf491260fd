//! Compute command splitting one bill over a period.
//!
//! Arguments not given on the command line are asked for on stderr, so the
//! reports on stdout can still be redirected.

use std::fmt::Write;
use std::io::{self, BufRead};

use anyhow::{Context, Result};
use biller_core::{BillOutcome, BillRequest, Biller, Charge, Day};
use serde::Serialize;

use super::bills::format_bills;
use super::prompt::Prompter;

/// Compute arguments as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ComputeArgs {
    pub bill: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub amount: Option<String>,
}

/// Fully answered compute arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Answers {
    pub bill: String,
    pub start: String,
    pub end: String,
    pub amount: f64,
}

impl Answers {
    pub fn request(&self) -> BillRequest<'_> {
        BillRequest {
            selector: &self.bill,
            start: &self.start,
            end: &self.end,
            amount: self.amount,
        }
    }
}

/// Fills in missing arguments by prompting. The bill list is shown whenever
/// the amount is missing, which covers every incomplete command line.
pub fn gather<R: BufRead, W: io::Write>(
    biller: &Biller,
    args: ComputeArgs,
    prompter: &mut Prompter<R, W>,
) -> Result<Answers> {
    if args.amount.is_none() {
        prompter.say(&format!("List of bills:\n{}\n", format_bills(biller.bills())))?;
    }
    let bill = prompter.value_or_ask(args.bill, "Which bill to generate?")?;
    let start = prompter.value_or_ask(args.start, "Bill start date (incl.)? (YYYYMMDD)")?;
    let end = prompter.value_or_ask(args.end, "Bill end date (incl.)? (YYYYMMDD)")?;
    let amount = prompter.value_or_ask(args.amount, "Amount?")?;
    let amount = amount
        .parse::<f64>()
        .with_context(|| format!("invalid amount: {amount}"))?;

    Ok(Answers {
        bill,
        start,
        end,
        amount,
    })
}

const BANNER: &str = "========================";

/// Formats the shares report and, when present, the billed report.
pub fn format_outcome(outcome: &BillOutcome) -> String {
    let mut output = String::new();
    writeln!(output, "{BANNER}\n==== SHARES REPORT =====\n{BANNER}").unwrap();
    output.push_str(&outcome.shares_report);

    if !outcome.billed_report.is_empty() {
        writeln!(output, "{BANNER}\n==== BILLED REPORT =====\n{BANNER}").unwrap();
        output.push_str(&outcome.billed_report);
        if !outcome.billed_report.ends_with('\n') {
            output.push('\n');
        }
    }
    output
}

/// JSON representation of a computed bill.
#[derive(Debug, Serialize)]
pub struct JsonBill<'a> {
    pub bill: &'a str,
    pub mode: &'a str,
    pub start: Day,
    pub end: Day,
    pub amount: f64,
    pub intervals: Vec<JsonInterval<'a>>,
    /// Amount per share unit; absent for an unknown mode.
    pub rate: Option<f64>,
    pub charges: &'a [Charge],
}

/// One interval of constant occupancy.
#[derive(Debug, Serialize)]
pub struct JsonInterval<'a> {
    pub start: Day,
    pub end: Day,
    pub days: i64,
    pub present: Vec<&'a str>,
}

impl<'a> JsonBill<'a> {
    pub fn new(biller: &'a Biller, outcome: &'a BillOutcome) -> Self {
        let intervals = outcome
            .intervals
            .iter()
            .map(|interval| JsonInterval {
                start: interval.start,
                end: interval.end,
                days: interval.duration_days,
                present: biller
                    .roster()
                    .members_in_order(&interval.snapshot.members)
                    .collect(),
            })
            .collect();

        Self {
            bill: &outcome.bill.description,
            mode: &outcome.bill.mode,
            start: outcome.start,
            end: outcome.end,
            amount: outcome.amount,
            intervals,
            rate: outcome.allocation.as_ref().map(|a| a.rate),
            charges: outcome.charges(),
        }
    }
}

/// Runs the compute command.
pub fn run(biller: &Biller, args: ComputeArgs, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stderr());
    let answers = gather(biller, args, &mut prompter)?;

    let outcome = biller.compute(&answers.request())?;

    if json {
        let output = serde_json::to_string_pretty(&JsonBill::new(biller, &outcome))?;
        println!("{output}");
    } else {
        print!("{}", format_outcome(&outcome));
    }

    Ok(())
}
