//! Export subcommand implementation.
//!
//! Handles the `hostscan export <scan-id>` command for exporting saved scans.

use crate::cli::{Context, OutputFormat};
use crate::error::CliResult;
use crate::output;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Export a saved scan.
#[derive(Parser, Debug)]
pub struct ExportCommand {
    /// Scan ID or prefix to export
    ///
    /// Can be a full UUID or the first few characters (short ID).
    #[arg(value_name = "SCAN_ID")]
    pub scan_id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,
}

impl ExportCommand {
    /// Execute the export command.
    pub fn execute(&self, ctx: &Context) -> CliResult<()> {
        let store = ctx.store()?;
        let record = store.find(&self.scan_id)?;

        match &self.output_file {
            Some(path) => {
                let mut out = BufWriter::new(File::create(path)?);
                output::write_record(&mut out, &record, self.format)?;
                out.flush()?;

                if !ctx.quiet {
                    output::print_success(&format!(
                        "Exported scan {} to {}",
                        record.id.short(),
                        path.display()
                    ));
                }
            }
            None => {
                let stdout = io::stdout();
                output::write_record(&mut stdout.lock(), &record, self.format)?;
            }
        }

        Ok(())
    }
}
