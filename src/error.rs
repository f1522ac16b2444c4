use chrono::NaiveDate;
use thiserror::Error;

/// Fatal conditions. Anything recoverable is recorded through
/// [`crate::audit::AuditLog`] instead and never surfaces as an `Err`.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{file} contains invalid data on line {line}: {content}")]
    InvalidConfigLine {
        file: String,
        line: usize,
        content: String,
    },

    #[error("{file} defines timekeeper \"{name}\" more than once on line {line}")]
    DuplicateTimekeeper {
        file: String,
        line: usize,
        name: String,
    },

    #[error("{file} does not contain a tax id line")]
    MissingTaxId { file: String },

    #[error("could not read configuration file {file}: {source}")]
    ConfigIo {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{invoice} - Invoices with expenses as the first line item are not supported.")]
    ExpenseFirst { invoice: String },

    #[error("{invoice} - Invoices with adjustments or discounts as the first line item are not supported.")]
    AdjustmentFirst { invoice: String },

    #[error("{invoice} - {date} - Cannot find timekeeper \"{name}\" from line {line} in the configuration file.")]
    UnknownTimekeeper {
        invoice: String,
        date: NaiveDate,
        name: String,
        line: usize,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
