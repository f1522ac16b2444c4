use crate::error::Result;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// One row of a Freshbooks invoice export. Field names mirror the
/// headers Freshbooks writes, so the reader binds by column name and
/// tolerates reordered or extra columns.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingRow {
    #[serde(rename = "Client Name")]
    pub client_name: Option<String>,
    #[serde(rename = "Invoice #")]
    pub invoice_number: String,
    #[serde(rename = "Date Issued")]
    pub date_issued: Option<NaiveDate>,
    #[serde(rename = "Invoice Status")]
    pub invoice_status: Option<String>,
    #[serde(rename = "Date Paid")]
    pub date_paid: Option<NaiveDate>,
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Item Description")]
    pub item_description: String,
    #[serde(rename = "Rate")]
    pub rate: Option<Decimal>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<Decimal>,
    #[serde(rename = "Discount Percentage")]
    pub discount_percentage: Option<Decimal>,
    #[serde(rename = "Line Subtotal")]
    pub line_subtotal: Decimal,
    #[serde(rename = "Tax 1 Type")]
    pub tax1_type: Option<String>,
    #[serde(rename = "Tax 1 Amount")]
    pub tax1_amount: Option<Decimal>,
    #[serde(rename = "Tax 2 Type")]
    pub tax2_type: Option<String>,
    #[serde(rename = "Tax 2 Amount")]
    pub tax2_amount: Option<Decimal>,
    #[serde(rename = "Line Total")]
    pub line_total: Decimal,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
}

/// Reads every billing row from a Freshbooks CSV export.
pub fn read_billing_rows(path: &Path) -> Result<Vec<BillingRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: BillingRow = result?;
        rows.push(row);
    }

    debug!("Read {} billing rows from {}", rows.len(), path.display());
    Ok(rows)
}
