//! Timeline command printing reconstructed occupancy.

use std::fmt::Write;

use anyhow::Result;
use biller_core::Biller;

/// Formats one `YYYYMMDD: members` line per snapshot, members in roster order.
pub fn format_timeline(biller: &Biller) -> String {
    let mut output = String::new();
    for snapshot in biller.timeline().snapshots() {
        let members: Vec<&str> = biller
            .roster()
            .members_in_order(&snapshot.members)
            .collect();
        let listing = if members.is_empty() {
            "nobody".to_string()
        } else {
            members.join(", ")
        };
        writeln!(output, "{}: {listing}", snapshot.date).unwrap();
    }
    output
}

/// Runs the timeline command.
pub fn run(biller: &Biller) -> Result<()> {
    if biller.timeline().snapshots().is_empty() {
        println!("No activities recorded.");
        return Ok(());
    }
    print!("{}", format_timeline(biller));
    Ok(())
}
