//! `quarry status` command

use anyhow::Result;

use crate::cli::StatusArgs;
use crate::commands::Session;
use quarry::builder::BuildProfile;
use quarry::ops::status;

pub fn execute(args: StatusArgs, session: &Session) -> Result<()> {
    let ctx = session.context(BuildProfile::default());

    let report = status(&ctx, args.force)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.full_rebuild {
        println!("Full rebuild: no usable ledger");
    }

    if report.sources.is_empty() {
        println!("Up to date ({} source(s))", report.up_to_date);
        return Ok(());
    }

    println!("Would compile {} source(s):", report.sources.len());
    for entry in &report.sources {
        println!("  {}  ({})", entry.path.display(), entry.reason);
    }

    if !report.headers.is_empty() {
        println!("Stale headers:");
        for entry in &report.headers {
            println!("  {}  ({})", entry.path.display(), entry.reason);
        }
    }

    Ok(())
}
