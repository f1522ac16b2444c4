use crate::roster::Timekeeper;
use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// LEDES EXP/FEE/INV_ADJ_TYPE classification for a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeKind {
    Fee,
    Expense,
    InvoiceAdjustment,
}

impl ChargeKind {
    pub fn code(self) -> &'static str {
        match self {
            ChargeKind::Fee => "F",
            ChargeKind::Expense => "E",
            ChargeKind::InvoiceAdjustment => "IF",
        }
    }
}

/// A single converted billing line, owned by its invoice.
#[derive(Debug, Clone)]
pub struct LineItem {
    /// 1-based position of the source row within the input file.
    pub number: usize,
    pub kind: ChargeKind,
    pub units: Option<Decimal>,
    pub adjustment_amount: Option<Decimal>,
    pub total: Decimal,
    pub date: NaiveDate,
    pub task_code: String,
    pub expense_code: String,
    pub activity_code: String,
    pub timekeeper: Option<Timekeeper>,
    pub description: String,
    pub unit_cost: Option<Decimal>,
}

/// Everything known about one invoice number so far.
///
/// `begin`, `end`, and `invoice_date` stay unset until the first
/// standard row parses. Expense and adjustment rows refuse to be the
/// row that seeds them.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub number: String,
    pub begin: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub invoice_date: Option<NaiveDate>,
    pub our_matter: String,
    pub our_client: String,
    pub client_matter: String,
    pub items: Vec<LineItem>,
}

impl Invoice {
    pub fn new(number: String) -> Self {
        Self {
            number,
            begin: None,
            end: None,
            invoice_date: None,
            our_matter: String::new(),
            our_client: String::new(),
            client_matter: String::new(),
            items: Vec::new(),
        }
    }

    /// Derived on demand so it can never drift from the line items.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.total).sum()
    }
}

/// Invoices keyed by number, kept in the order first seen so output
/// files read the way the input did.
#[derive(Debug, Clone, Default)]
pub struct InvoiceBook {
    invoices: IndexMap<String, Invoice>,
}

impl InvoiceBook {
    pub fn get_or_create(&mut self, number: &str) -> &mut Invoice {
        self.invoices
            .entry(number.to_string())
            .or_insert_with(|| Invoice::new(number.to_string()))
    }

    pub fn get(&self, number: &str) -> Option<&Invoice> {
        self.invoices.get(number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.values()
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}
