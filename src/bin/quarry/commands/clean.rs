//! `quarry clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use crate::commands::Session;
use quarry::builder::BuildProfile;
use quarry::ops::clean;

pub fn execute(_args: CleanArgs, session: &Session) -> Result<()> {
    let ctx = session.context(BuildProfile::default());

    let removed = clean(&ctx)?;

    if !session.quiet {
        eprintln!("     Removed {} file(s)", removed.len());
    }

    Ok(())
}
