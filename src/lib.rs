//! # LEDES Converter
//!
//! A library for converting Freshbooks invoice exports (CSV) into LEDES
//! 1998B electronic billing files, with an audit trail of everything a
//! billing reviewer should look at before submitting.
//!
//! ## Core Concepts
//!
//! - **Billing rows**: one CSV line per charge, as Freshbooks exports them
//! - **Invoices**: rows grouped by invoice number, kept in file order
//! - **Line items**: fees, expenses, and adjustments with UTBMS task/activity codes
//! - **Configuration**: the firm's tax id, invoice cap, and timekeeper roster
//! - **Audit log**: warnings and errors collected during the run and written
//!   to the errors artifact alongside the LEDES output
//!
//! ## Example
//!
//! ```rust,ignore
//! use ledes_converter::*;
//!
//! let configuration = Configuration::load("config.txt")?;
//! let report = convert_invoice_file(&configuration, "invoices.csv")?;
//!
//! println!("LEDES file: {}", report.artifacts.ledes.display());
//! for message in &report.messages {
//!     println!("{message}");
//! }
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod invoice;
pub mod ledes;
pub mod output;
pub mod patterns;
pub mod roster;
pub mod utils;

pub use audit::AuditLog;
pub use config::Configuration;
pub use engine::process_rows;
pub use error::{ConvertError, Result};
pub use ingestion::*;
pub use invoice::*;
pub use ledes::{LedesRecord, FIELD_NAMES, PREAMBLE};
pub use output::{write_artifacts, ArtifactPaths};
pub use patterns::LineKind;
pub use roster::{Roster, Timekeeper};
pub use utils::*;

use log::info;
use std::path::Path;

/// What one conversion run produced: the artifact locations and the
/// audit messages in the order they were found. The errors artifact
/// holds the same messages, sorted.
#[derive(Debug)]
pub struct ConversionReport {
    pub artifacts: ArtifactPaths,
    pub messages: Vec<String>,
}

pub struct Converter;

impl Converter {
    pub fn convert(
        configuration: &Configuration,
        invoice_path: &Path,
    ) -> Result<ConversionReport> {
        info!("Converting {}", invoice_path.display());

        let rows = ingestion::read_billing_rows(invoice_path)?;
        let mut audit = AuditLog::new();
        let invoices = engine::process_rows(configuration, &rows, &mut audit)?;
        info!(
            "Grouped {} rows into {} invoices",
            rows.len(),
            invoices.len()
        );

        let artifacts =
            output::write_artifacts(configuration, invoice_path, &invoices, &mut audit)?;

        Ok(ConversionReport {
            artifacts,
            messages: audit.into_messages(),
        })
    }
}

pub fn convert_invoice_file(
    configuration: &Configuration,
    invoice_path: impl AsRef<Path>,
) -> Result<ConversionReport> {
    Converter::convert(configuration, invoice_path.as_ref())
}
