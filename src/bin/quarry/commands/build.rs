//! `quarry build` command

use std::time::Instant;

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::Session;
use quarry::builder::BuildProfile;
use quarry::ops::quarry_build::{build, BuildOptions};

pub fn execute(args: BuildArgs, session: &Session) -> Result<()> {
    let start = Instant::now();

    let profile = BuildProfile {
        debug: args.debug,
        sanitize: args.sanitize,
    };
    let ctx = session.context(profile);
    let toolchain = ctx.native_toolchain();

    let opts = BuildOptions {
        force: args.force,
        link_only: args.link,
        tables: args.tables,
        progress: session.show_progress(),
    };

    let result = build(&ctx, &toolchain, &opts)?;

    if !session.quiet {
        let compiled = result.outcome.compiled.len();
        if compiled == 0 {
            eprintln!(
                "    Finished {} (sources up to date) in {:.2}s",
                ctx.display_path(ctx.binary()),
                start.elapsed().as_secs_f64()
            );
        } else {
            eprintln!(
                "    Finished {} ({} compiled) in {:.2}s",
                ctx.display_path(ctx.binary()),
                compiled,
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}
