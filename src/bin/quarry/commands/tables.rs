//! `quarry tables` command

use anyhow::Result;

use crate::cli::TablesArgs;
use crate::commands::Session;
use quarry::builder::BuildProfile;
use quarry::ops::generate_tables;

pub fn execute(args: TablesArgs, session: &Session) -> Result<()> {
    let ctx = session.context(BuildProfile::default());

    let outcomes = generate_tables(&ctx, args.domain.as_deref())?;

    if !session.quiet {
        if outcomes.is_empty() {
            eprintln!("    Finished no component directories found");
        }
        for outcome in &outcomes {
            let state = if outcome.written { "updated" } else { "unchanged" };
            eprintln!(
                "    Finished {} ({} component(s), {} entries, {})",
                ctx.display_path(&outcome.output),
                outcome.components,
                outcome.table_size,
                state
            );
        }
    }

    Ok(())
}
