use crate::config::Configuration;
use crate::invoice::{Invoice, LineItem};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Opening line of every LEDES1998B file.
pub const PREAMBLE: &str = "LEDES1998B[]";

/// The 24 LEDES1998B field names, in wire order.
pub const FIELD_NAMES: [&str; 24] = [
    "INVOICE_DATE",
    "INVOICE_NUMBER",
    "CLIENT_ID",
    "LAW_FIRM_MATTER_ID",
    "INVOICE_TOTAL",
    "BILLING_START_DATE",
    "BILLING_END_DATE",
    "INVOICE_DESCRIPTION",
    "LINE_ITEM_NUMBER",
    "EXP/FEE/INV_ADJ_TYPE",
    "LINE_ITEM_NUMBER_OF_UNITS",
    "LINE_ITEM_ADJUSTMENT_AMOUNT",
    "LINE_ITEM_TOTAL",
    "LINE_ITEM_DATE",
    "LINE_ITEM_TASK_CODE",
    "LINE_ITEM_EXPENSE_CODE",
    "LINE_ITEM_ACTIVITY_CODE",
    "TIMEKEEPER_ID",
    "LINE_ITEM_DESCRIPTION",
    "LAW_FIRM_ID",
    "LINE_ITEM_UNIT_COST",
    "TIMEKEEPER_NAME",
    "TIMEKEEPER_CLASSIFICATION",
    "CLIENT_MATTER_ID",
];

/// One fully rendered LEDES1998B output row. Absent values are empty
/// strings, which is how the format spells null.
#[derive(Debug, Clone)]
pub struct LedesRecord {
    pub invoice_date: String,
    pub invoice_number: String,
    pub client_id: String,
    pub law_firm_matter_id: String,
    pub invoice_total: String,
    pub billing_start_date: String,
    pub billing_end_date: String,
    pub invoice_description: String,
    pub line_item_number: String,
    pub exp_fee_inv_adj_type: String,
    pub line_item_number_of_units: String,
    pub line_item_adjustment_amount: String,
    pub line_item_total: String,
    pub line_item_date: String,
    pub line_item_task_code: String,
    pub line_item_expense_code: String,
    pub line_item_activity_code: String,
    pub timekeeper_id: String,
    pub line_item_description: String,
    pub law_firm_id: String,
    pub line_item_unit_cost: String,
    pub timekeeper_name: String,
    pub timekeeper_classification: String,
    pub client_matter_id: String,
}

impl LedesRecord {
    /// Flattens one line item and its parent invoice into a record.
    pub fn build(configuration: &Configuration, invoice: &Invoice, item: &LineItem) -> Self {
        let timekeeper = item.timekeeper.as_ref();
        Self {
            invoice_date: format_opt_date(invoice.invoice_date),
            invoice_number: invoice.number.clone(),
            client_id: invoice.our_client.clone(),
            law_firm_matter_id: invoice.our_matter.clone(),
            invoice_total: format_amount(invoice.total(), 4),
            billing_start_date: format_opt_date(invoice.begin),
            billing_end_date: format_opt_date(invoice.end),
            invoice_description: String::new(),
            line_item_number: item.number.to_string(),
            exp_fee_inv_adj_type: item.kind.code().to_string(),
            line_item_number_of_units: format_opt_amount(item.units, 2),
            line_item_adjustment_amount: format_opt_amount(item.adjustment_amount, 2),
            line_item_total: format_amount(item.total, 2),
            line_item_date: format_date(item.date),
            line_item_task_code: item.task_code.clone(),
            line_item_expense_code: item.expense_code.clone(),
            line_item_activity_code: item.activity_code.clone(),
            timekeeper_id: timekeeper.map(|t| t.id.to_string()).unwrap_or_default(),
            line_item_description: item.description.clone(),
            law_firm_id: configuration.tax_id.clone(),
            line_item_unit_cost: format_opt_amount(item.unit_cost, 2),
            timekeeper_name: timekeeper.map(|t| t.name.clone()).unwrap_or_default(),
            timekeeper_classification: timekeeper
                .map(|t| t.classification.clone())
                .unwrap_or_default(),
            client_matter_id: invoice.client_matter.clone(),
        }
    }

    /// Field values in wire order, parallel to [`FIELD_NAMES`].
    pub fn fields(&self) -> [&str; 24] {
        [
            &self.invoice_date,
            &self.invoice_number,
            &self.client_id,
            &self.law_firm_matter_id,
            &self.invoice_total,
            &self.billing_start_date,
            &self.billing_end_date,
            &self.invoice_description,
            &self.line_item_number,
            &self.exp_fee_inv_adj_type,
            &self.line_item_number_of_units,
            &self.line_item_adjustment_amount,
            &self.line_item_total,
            &self.line_item_date,
            &self.line_item_task_code,
            &self.line_item_expense_code,
            &self.line_item_activity_code,
            &self.timekeeper_id,
            &self.line_item_description,
            &self.law_firm_id,
            &self.line_item_unit_cost,
            &self.timekeeper_name,
            &self.timekeeper_classification,
            &self.client_matter_id,
        ]
    }

    /// Renders the record as one `|`-delimited LEDES line, terminated
    /// by `[]` and no newline.
    pub fn to_pipe_line(&self) -> String {
        format!("{}[]", self.fields().join("|"))
    }
}

/// The `|`-delimited header line naming all 24 fields.
pub fn header_line() -> String {
    format!("{}[]", FIELD_NAMES.join("|"))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

/// Fixed-point rendering with the half-away-from-zero rounding LEDES
/// consumers expect.
pub fn format_amount(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.precision$}", precision = places as usize)
}

pub fn format_opt_amount(value: Option<Decimal>, places: u32) -> String {
    value.map(|v| format_amount(v, places)).unwrap_or_default()
}
