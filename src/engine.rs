use crate::audit::AuditLog;
use crate::config::Configuration;
use crate::error::{ConvertError, Result};
use crate::ingestion::BillingRow;
use crate::invoice::{ChargeKind, Invoice, InvoiceBook, LineItem};
use crate::ledes::format_amount;
use crate::patterns::{self, LineKind};
use crate::utils::month_end;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Builds the invoice book for one input file.
///
/// Rows are consumed in file order and keep a 1-based running number
/// that becomes the LEDES line-item number. Rows that cannot be
/// converted are recorded in the audit log and dropped; conditions the
/// output could not survive (an unknown timekeeper, an expense before
/// any dated work) abort the whole file instead.
pub fn process_rows(
    configuration: &Configuration,
    rows: &[BillingRow],
    audit: &mut AuditLog,
) -> Result<InvoiceBook> {
    let mut invoices = InvoiceBook::default();

    for (index, row) in rows.iter().enumerate() {
        let number = index + 1;
        let invoice = invoices.get_or_create(&row.invoice_number);

        let item = match patterns::line_kind(&row.item_name) {
            Some(LineKind::Expense) => Some(handle_expense(number, row, invoice, audit)?),
            Some(LineKind::Adjustment) | Some(LineKind::Discount) => {
                Some(handle_adjustment(number, row, invoice)?)
            }
            None => handle_standard(configuration, number, row, invoice, audit)?,
        };

        if let Some(item) = item {
            invoice.items.push(item);
        }
    }

    Ok(invoices)
}

/// Expense rows carry no parseable service date, so they borrow the
/// month-end of the invoice's date range. An expense with no prior
/// dated work has nothing to borrow, which is fatal.
fn handle_expense(
    number: usize,
    row: &BillingRow,
    invoice: &mut Invoice,
    audit: &mut AuditLog,
) -> Result<LineItem> {
    let (Some(_), Some(_), Some(end)) = (invoice.invoice_date, invoice.begin, invoice.end) else {
        return Err(ConvertError::ExpenseFirst {
            invoice: row.invoice_number.clone(),
        });
    };

    let month_end = month_end(end);
    if end < month_end {
        invoice.end = Some(month_end);
    }

    let code = patterns::expense_code(&row.item_description)
        .map(str::to_string)
        .unwrap_or_default();

    if row.line_total > Decimal::new(5_000, 0) {
        audit.warn(format!(
            "{} - WARNING total for expense is over $5K, actual amount: {}",
            row.invoice_number,
            format_amount(row.line_total, 2)
        ));
    }

    Ok(LineItem {
        number,
        kind: ChargeKind::Expense,
        units: row.quantity,
        adjustment_amount: None,
        total: row.line_total,
        date: month_end,
        task_code: String::new(),
        expense_code: code,
        activity_code: String::new(),
        timekeeper: None,
        description: row.item_description.clone(),
        unit_cost: row.rate,
    })
}

fn handle_adjustment(number: usize, row: &BillingRow, invoice: &mut Invoice) -> Result<LineItem> {
    let (Some(_), Some(_), Some(end)) = (invoice.invoice_date, invoice.begin, invoice.end) else {
        return Err(ConvertError::AdjustmentFirst {
            invoice: row.invoice_number.clone(),
        });
    };

    let month_end = month_end(end);
    if end < month_end {
        invoice.end = Some(month_end);
    }

    let (task, activity) = patterns::task_and_activity(&row.item_description)
        .map(|(task, activity)| (task.to_string(), activity.to_string()))
        .unwrap_or_default();

    Ok(LineItem {
        number,
        kind: ChargeKind::InvoiceAdjustment,
        units: row.quantity,
        adjustment_amount: Some(row.line_total),
        total: row.line_total,
        date: month_end,
        task_code: task,
        expense_code: String::new(),
        activity_code: activity,
        timekeeper: None,
        description: row.item_description.clone(),
        unit_cost: row.rate,
    })
}

/// A standard fee row. Returns `Ok(None)` when the row is dropped
/// after a recorded error.
fn handle_standard(
    configuration: &Configuration,
    number: usize,
    row: &BillingRow,
    invoice: &mut Invoice,
    audit: &mut AuditLog,
) -> Result<Option<LineItem>> {
    let Some(fields) = patterns::parse_description(&row.item_description) else {
        audit.error(format!(
            "{} - ERROR: Unparseable line #{}: {}",
            row.invoice_number,
            number + 1,
            row.item_description
        ));
        return Ok(None);
    };

    let date_text = format!("{} {} {}", fields.month, fields.day, fields.year);
    let Ok(line_date) = NaiveDate::parse_from_str(&date_text, "%b %d %Y") else {
        audit.error(format!(
            "{} - ERROR: Unparseable line date #{}: {}",
            row.invoice_number,
            number + 1,
            date_text
        ));
        return Ok(None);
    };

    if invoice.begin.map_or(true, |begin| line_date < begin) {
        invoice.begin = Some(line_date);
    }
    if invoice.end.map_or(true, |end| line_date > end) {
        invoice.end = Some(line_date);
    }
    if invoice.invoice_date.is_none() {
        invoice.invoice_date = row.date_issued;
    }

    // First non-blank value wins for each of these and then sticks for
    // the rest of the invoice.
    if invoice.our_matter.trim().is_empty() {
        invoice.our_matter = fields.our_matter.to_string();
    }
    if invoice.our_client.trim().is_empty() {
        invoice.our_client = fields.our_client.to_string();
    }
    if invoice.client_matter.trim().is_empty() {
        invoice.client_matter = fields.client_matter.unwrap_or_default().to_string();
    }

    let mut task = String::new();
    let mut expense = String::new();
    let mut activity = String::new();
    let kind;

    if let Some(token) = fields.utbms {
        let Some((expense_or_task, activity_half)) = patterns::split_utbms(token) else {
            audit.error(format!(
                "{} - {} - ERROR: Skipping row unparseable UTBMS code line #{}: {}",
                row.invoice_number,
                line_date,
                number + 1,
                row.item_description
            ));
            return Ok(None);
        };
        match activity_half {
            Some(activity_code) => {
                kind = ChargeKind::Fee;
                task = expense_or_task.to_string();
                activity = activity_code.to_string();
            }
            None => {
                kind = ChargeKind::Expense;
                expense = expense_or_task.to_string();
            }
        }
    } else {
        kind = ChargeKind::Fee;
        // A client matter id means the client demands coded lines, so
        // flag the omission. The row itself still goes through.
        if !invoice.client_matter.trim().is_empty() {
            audit.error(format!(
                "{} - {} - ERROR: Missing required UTBMS code line #{}: {}",
                row.invoice_number,
                line_date,
                number + 1,
                row.item_description
            ));
        }
    }

    let narrative = fields.narrative;
    if patterns::word_count(narrative) > 30 {
        audit.warn(format!(
            "{} - {} - WARNING long description, >30 words: {}",
            row.invoice_number, line_date, narrative
        ));
    }

    if let Some(buzzword) = patterns::find_buzzword(narrative) {
        audit.warn(format!(
            "{} - {} - WARNING \"{}\" is a flagged word or phrase in: {}",
            row.invoice_number, line_date, buzzword, narrative
        ));
    }

    if let Some(patent_number) = patterns::find_patent_number(narrative) {
        audit.warn(format!(
            "{} - {} - WARNING \"{}\" may be a patent number in: {}",
            row.invoice_number, line_date, patent_number, narrative
        ));
    }

    if patterns::mentions_flat_fee(narrative) {
        audit.warn(format!(
            "{} - {} - WARNING possible flat fee in: {}",
            row.invoice_number, line_date, narrative
        ));
    }

    if let Some(quantity) = row.quantity {
        let drift = (quantity.round_dp(1) - quantity).abs();
        if drift > Decimal::new(2, 2) {
            audit.warn(format!(
                "{} - {} - WARNING \"{}\" is a time unit not in tenths of an hour, e.g. only 0.1, 0.2, etc, are allowed: {}",
                row.invoice_number, line_date, quantity, narrative
            ));
        }
    }

    let name = patterns::normalize_whitespace(fields.timekeeper);
    let timekeeper = if name.trim().is_empty() {
        None
    } else {
        let Some(person) = configuration.timekeepers.get(&name) else {
            return Err(ConvertError::UnknownTimekeeper {
                invoice: row.invoice_number.clone(),
                date: line_date,
                name,
                line: number + 1,
            });
        };
        if person.rate == Some(Decimal::ZERO) {
            audit.warn(format!(
                "{} - {} - WARNING \"{}\" does not have a non-zero rate in the configuration file.",
                row.invoice_number, line_date, person.name
            ));
        } else if let (Some(configured), Some(invoiced)) = (person.rate, row.rate) {
            if configured != invoiced {
                audit.warn(format!(
                    "{} - {} - WARNING \"{}\" has a rate of {} in the configuration file, but the invoice line has a rate of {}.",
                    row.invoice_number, line_date, person.name, configured, invoiced
                ));
            }
        }
        Some(person.clone())
    };

    Ok(Some(LineItem {
        number,
        kind,
        units: row.quantity,
        adjustment_amount: None,
        total: row.line_total,
        date: line_date,
        task_code: task,
        expense_code: expense,
        activity_code: activity,
        timekeeper,
        description: narrative.to_string(),
        unit_cost: row.rate,
    }))
}
