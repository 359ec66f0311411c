//! History subcommand implementation.

use crate::cli::Context;
use crate::error::CliResult;
use crate::output;
use crate::storage::ScanStore;
use clap::Parser;
use std::io::{self, Write};

/// View and manage scan history.
#[derive(Parser, Debug)]
pub struct HistoryCommand {
    /// Number of recent scans to show
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Delete all saved scans
    #[arg(long, conflicts_with = "prune")]
    pub clear: bool,

    /// Delete scans older than N days
    #[arg(long, value_name = "DAYS")]
    pub prune: Option<u32>,
}

impl HistoryCommand {
    pub fn execute(&self, ctx: &Context) -> CliResult<()> {
        let store = ctx.store()?;

        if self.clear {
            let removed = store.clear()?;
            if !ctx.quiet {
                output::print_success(&format!("Deleted {} saved scan(s)", removed));
            }
            return Ok(());
        }

        if let Some(days) = self.prune {
            let removed = store.cleanup(chrono::Duration::days(i64::from(days)))?;
            if !ctx.quiet {
                output::print_success(&format!(
                    "Deleted {} scan(s) older than {} day(s)",
                    removed, days
                ));
            }
            return Ok(());
        }

        let stdout = io::stdout();
        self.write_listing(&mut stdout.lock(), &store)
    }

    fn write_listing<W: Write>(&self, out: &mut W, store: &ScanStore) -> CliResult<()> {
        let records = store.list_recent(self.count)?;
        if records.is_empty() {
            writeln!(out, "No saved scans.")?;
            return Ok(());
        }

        for record in &records {
            writeln!(
                out,
                "{}  {}",
                record.created_at.format("%Y-%m-%d %H:%M:%S"),
                record.summary()
            )?;
        }
        Ok(())
    }
}
