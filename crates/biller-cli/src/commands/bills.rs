//! Bills command listing the bills a data file defines.

use std::fmt::Write;

use anyhow::Result;
use biller_core::BillDefinition;

/// Formats one `[index]: description - mode` line per bill.
pub fn format_bills(bills: &[BillDefinition]) -> String {
    let mut output = String::new();
    for (i, bill) in bills.iter().enumerate() {
        writeln!(output, "[{i}]: {} - {}", bill.description, bill.mode).unwrap();
    }
    output
}

/// Runs the bills command.
pub fn run(bills: &[BillDefinition]) -> Result<()> {
    if bills.is_empty() {
        println!("No bills defined.");
        return Ok(());
    }
    print!("{}", format_bills(bills));
    Ok(())
}
