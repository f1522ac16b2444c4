use anyhow::{bail, Context, Result};
use clap::Parser;
use ledes_converter::{convert_invoice_file, Configuration};
use log::error;
use std::path::PathBuf;

/// Convert Freshbooks invoice exports into LEDES 1998B billing files.
///
/// Each input file produces six artifacts next to it: the LEDES file, a
/// CSV mirror of it, a per-invoice summary, copies of the configuration
/// and the input, and the list of warnings and errors from the run.
#[derive(Parser)]
#[command(name = "ledes-converter", version)]
struct Cli {
    /// Configuration file with the firm's tax id, invoice cap, and
    /// timekeeper roster
    #[arg(short, long)]
    config: PathBuf,

    /// Freshbooks CSV invoice exports to convert
    #[arg(required = true)]
    invoices: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let configuration = Configuration::load(&cli.config).with_context(|| {
        format!(
            "failed to load configuration from {}",
            cli.config.display()
        )
    })?;

    let mut failures = 0usize;
    for invoice_path in &cli.invoices {
        match convert_invoice_file(&configuration, invoice_path) {
            Ok(report) => {
                for message in &report.messages {
                    println!("{message}");
                }
                println!(
                    "{}: wrote {}",
                    invoice_path.display(),
                    report.artifacts.ledes.display()
                );
            }
            Err(err) => {
                error!("{}: {err}", invoice_path.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!(
            "{failures} of {} invoice file(s) failed to convert",
            cli.invoices.len()
        );
    }
    Ok(())
}
