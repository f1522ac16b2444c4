use crate::audit::AuditLog;
use crate::config::Configuration;
use crate::error::Result;
use crate::invoice::InvoiceBook;
use crate::ledes::{self, LedesRecord};
use chrono::{Local, NaiveDate};
use log::info;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

const SUMMARY_HEADER: [&str; 6] = [
    "Invoice Number",
    "Matter",
    "Earliest Date",
    "Latest Date",
    "Invoice Date",
    "Total",
];

/// Where one conversion run landed on disk. All six artifacts sit next
/// to the input file and share a `YYYYMMDD<input-stem>` prefix so runs
/// from different days never clobber each other.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub csv: PathBuf,
    pub ledes: PathBuf,
    pub summary: PathBuf,
    pub config_copy: PathBuf,
    pub input_copy: PathBuf,
    pub errors: PathBuf,
}

/// Writes the six output artifacts for a processed invoice file.
///
/// Flattening the invoices can still add warnings (over-limit invoice
/// totals), so the errors artifact is written last, once the audit log
/// is complete.
pub fn write_artifacts(
    configuration: &Configuration,
    input_path: &Path,
    invoices: &InvoiceBook,
    audit: &mut AuditLog,
) -> Result<ArtifactPaths> {
    let mut records = Vec::new();
    for invoice in invoices.iter() {
        let total = invoice.total();
        if total > configuration.max_invoice_amount {
            let thousands =
                (configuration.max_invoice_amount / Decimal::new(1_000, 0)).normalize();
            audit.warn(format!(
                "{} - WARNING total for invoice is over ${}K, actual amount: {}",
                invoice.number,
                thousands,
                ledes::format_amount(total, 4)
            ));
        }
        for item in &invoice.items {
            records.push(LedesRecord::build(configuration, invoice, item));
        }
    }

    let date_tag = Local::now().date_naive().format("%Y%m%d").to_string();
    let paths = artifact_paths(input_path, &date_tag);

    write_csv(&paths.csv, &records)?;
    info!("Wrote CSV to {}", paths.csv.display());

    write_ledes(&paths.ledes, &records)?;
    info!("Wrote LEDES to {}", paths.ledes.display());

    write_summary(&paths.summary, invoices)?;
    info!("Wrote summary to {}", paths.summary.display());

    fs::copy(&configuration.source_path, &paths.config_copy)?;
    info!(
        "Copied configuration file to {}",
        paths.config_copy.display()
    );

    fs::copy(input_path, &paths.input_copy)?;
    info!("Copied invoice file to {}", paths.input_copy.display());

    write_errors(&paths.errors, audit.messages())?;
    info!("Wrote errors (if any) to {}", paths.errors.display());

    Ok(paths)
}

fn artifact_paths(input_path: &Path, date_tag: &str) -> ArtifactPaths {
    let directory = input_path.parent().unwrap_or_else(|| Path::new(""));
    let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
    let prefix = format!("{date_tag}{stem}");
    let named = |suffix: &str| directory.join(format!("{prefix}{suffix}"));

    ArtifactPaths {
        csv: named("-csv.csv"),
        ledes: named("-ledes.txt"),
        summary: named("-summary.csv"),
        config_copy: named("-configfileused.txt"),
        input_copy: named("-invoiceinput.csv"),
        errors: named("-errors.txt"),
    }
}

/// The same 24 columns as the LEDES file, but comma-separated with a
/// header row, for eyeballing in a spreadsheet.
fn write_csv(path: &Path, records: &[LedesRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(ledes::FIELD_NAMES)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_ledes(path: &Path, records: &[LedesRecord]) -> Result<()> {
    let mut text = String::new();
    text.push_str(ledes::PREAMBLE);
    text.push('\n');
    text.push_str(&ledes::header_line());
    text.push('\n');
    for record in records {
        text.push_str(&record.to_pipe_line());
        text.push('\n');
    }
    fs::write(path, text)?;
    Ok(())
}

fn write_summary(path: &Path, invoices: &InvoiceBook) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SUMMARY_HEADER)?;
    for invoice in invoices.iter() {
        let begin = summary_date(invoice.begin);
        let end = summary_date(invoice.end);
        let issued = summary_date(invoice.invoice_date);
        let total = ledes::format_amount(invoice.total(), 4);
        writer.write_record([
            invoice.number.as_str(),
            invoice.our_matter.as_str(),
            begin.as_str(),
            end.as_str(),
            issued.as_str(),
            total.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn summary_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Messages are sorted before writing, which groups them by invoice
/// number rather than by the order problems were found.
fn write_errors(path: &Path, messages: &[String]) -> Result<()> {
    let mut text = String::new();
    if messages.is_empty() {
        text.push_str("No errors this run\n");
    } else {
        let mut sorted = messages.to_vec();
        sorted.sort();
        for message in &sorted {
            text.push_str(message);
            text.push('\n');
        }
    }
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{ChargeKind, Invoice, LineItem};
    use crate::roster::Roster;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn configuration(source_path: PathBuf) -> Configuration {
        Configuration {
            tax_id: "12-3456789".to_string(),
            max_invoice_amount: dec!(20000),
            timekeepers: Roster::default(),
            source_path,
        }
    }

    fn invoice_with_total(number: &str, total: Decimal) -> Invoice {
        let mut invoice = Invoice::new(number.to_string());
        invoice.begin = NaiveDate::from_ymd_opt(2024, 1, 5);
        invoice.end = NaiveDate::from_ymd_opt(2024, 1, 9);
        invoice.invoice_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        invoice.our_matter = "ABCD-E1234".to_string();
        invoice.our_client = "ABCD".to_string();
        invoice.items.push(LineItem {
            number: 1,
            kind: ChargeKind::Fee,
            units: Some(dec!(1.5)),
            adjustment_amount: None,
            total,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            task_code: "L120".to_string(),
            expense_code: String::new(),
            activity_code: "A103".to_string(),
            timekeeper: None,
            description: "Drafted motion".to_string(),
            unit_cost: Some(dec!(450)),
        });
        invoice
    }

    #[test]
    fn test_artifact_paths_share_the_dated_prefix() {
        let paths = artifact_paths(Path::new("/tmp/in/invoices.csv"), "20240131");

        assert_eq!(
            paths.csv,
            PathBuf::from("/tmp/in/20240131invoices-csv.csv")
        );
        assert_eq!(
            paths.ledes,
            PathBuf::from("/tmp/in/20240131invoices-ledes.txt")
        );
        assert_eq!(
            paths.summary,
            PathBuf::from("/tmp/in/20240131invoices-summary.csv")
        );
        assert_eq!(
            paths.config_copy,
            PathBuf::from("/tmp/in/20240131invoices-configfileused.txt")
        );
        assert_eq!(
            paths.input_copy,
            PathBuf::from("/tmp/in/20240131invoices-invoiceinput.csv")
        );
        assert_eq!(
            paths.errors,
            PathBuf::from("/tmp/in/20240131invoices-errors.txt")
        );
    }

    #[test]
    fn test_ledes_file_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out-ledes.txt");
        write_ledes(&path, &[]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "LEDES1998B[]");
        assert!(lines[1].starts_with("INVOICE_DATE|INVOICE_NUMBER|"));
        assert!(lines[1].ends_with("CLIENT_MATTER_ID[]"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_errors_file_is_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out-errors.txt");
        let messages = vec![
            "INV-200 - WARNING something".to_string(),
            "INV-100 - ERROR: something else".to_string(),
        ];
        write_errors(&path, &messages).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "INV-100 - ERROR: something else\nINV-200 - WARNING something\n"
        );
    }

    #[test]
    fn test_errors_file_reports_a_clean_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out-errors.txt");
        write_errors(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "No errors this run\n");
    }

    #[test]
    fn test_summary_row_per_invoice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out-summary.csv");
        let mut invoices = InvoiceBook::default();
        *invoices.get_or_create("INV-100") = invoice_with_total("INV-100", dec!(675));
        write_summary(&path, &invoices).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Invoice Number,Matter,Earliest Date,Latest Date,Invoice Date,Total"
        );
        assert_eq!(
            lines[1],
            "INV-100,ABCD-E1234,2024-01-05,2024-01-09,2024-01-31,675.0000"
        );
    }

    #[test]
    fn test_over_limit_invoice_warns_and_artifacts_land() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("invoices.csv");
        let config_file = dir.path().join("config.txt");
        fs::write(&input, "placeholder input\n").unwrap();
        fs::write(&config_file, "12-3456789\n").unwrap();

        let configuration = configuration(config_file);
        let mut invoices = InvoiceBook::default();
        *invoices.get_or_create("INV-100") = invoice_with_total("INV-100", dec!(25000.5));
        let mut audit = AuditLog::new();

        let paths = write_artifacts(&configuration, &input, &invoices, &mut audit).unwrap();

        assert_eq!(
            audit.messages(),
            ["INV-100 - WARNING total for invoice is over $20K, actual amount: 25000.5000"]
        );
        for path in [
            &paths.csv,
            &paths.ledes,
            &paths.summary,
            &paths.config_copy,
            &paths.input_copy,
            &paths.errors,
        ] {
            assert!(path.exists(), "missing artifact {}", path.display());
        }
        assert_eq!(
            fs::read_to_string(&paths.input_copy).unwrap(),
            "placeholder input\n"
        );
        let errors = fs::read_to_string(&paths.errors).unwrap();
        assert!(errors.contains("over $20K"));
    }
}
