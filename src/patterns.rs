//! The fixed grammar used to pull billing structure out of free-text
//! invoice fields.
//!
//! Everything here matches case-insensitively. The description grammar
//! is the load-bearing one: it carves a Freshbooks item description of
//! the shape `(ABCD-E1234) Jane Doe – Jan 5, 2024  Drafted motion
//! ##L120-A103` into matter, timekeeper, service date, narrative, and
//! an optional trailing UTBMS token.

use once_cell::sync::Lazy;
use regex::Regex;

/// Item-name prefixes that route a row away from the standard handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Expense,
    Adjustment,
    Discount,
}

static LINE_KIND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?P<expense>e(?:xp(?:ense)?)?)|(?P<adjustment>a(?:dj(?:ustment)?)?)|(?P<discount>dis(?:count)?))\b",
    )
    .expect("line kind regex should compile")
});

static EXPENSE_UTBMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)##(?P<code>[A-Z]\d{3})").expect("expense UTBMS regex should compile")
});

static TASK_AND_ACTIVITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)##(?P<task>[A-Z]\d{3})-(?P<activity>[A-Z]\d{3})")
        .expect("task and activity regex should compile")
});

// The separator between the timekeeper and the date is an en-dash, not
// a hyphen. Freshbooks descriptions use it consistently.
static DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?is)\((?P<our_matter>(?P<our_client>[A-Z]{4})-[A-Z][0-9]{4})",
        r".*?(?:##\s*(?P<client_matter>.*?))?\)",
        r"\s*(?P<timekeeper>[^)]*?)",
        r"\s*–\s*",
        r"(?P<month>[A-Z]{3})\s(?P<day>\d+),\s(?P<year>\d{4})",
        r"\s+(?P<narrative>.*?)",
        r"(?:\s*##\s*(?P<utbms>.*?))?\s*$",
    ))
    .expect("description grammar should compile")
});

static GENERAL_UTBMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?P<expense_or_task>[^-]+)(?:-(?P<activity>\S+)|$)")
        .expect("general UTBMS regex should compile")
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should compile"));

static BUZZWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?is)attention|internal|travel|research",
        r"|touch(?:ing)?\s+base|reach(?:ing)?\s+out|communications\s+with",
        r"|train|administration|business\s+dev(?:elopment)?|courtesy|discount",
    ))
    .expect("buzzword regex should compile")
});

// 7+ digit runs, digit-grouped numbers, and the '123 shorthand all
// look like patent references.
static PATENT_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{7,}|\d,\d{3}.\d{3}|'\d{3}").expect("patent number regex should compile")
});

static FLAT_FEE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\b(?:(?:fixed|flat)\s+fee|FF)\b").expect("flat fee regex should compile")
});

/// Classifies a row by its item-name prefix. `None` means the row is a
/// standard fee line.
pub fn line_kind(item_name: &str) -> Option<LineKind> {
    let caps = LINE_KIND.captures(item_name)?;
    if caps.name("expense").is_some() {
        Some(LineKind::Expense)
    } else if caps.name("adjustment").is_some() {
        Some(LineKind::Adjustment)
    } else {
        Some(LineKind::Discount)
    }
}

/// The `##X123` expense code embedded in an expense item description.
pub fn expense_code(description: &str) -> Option<&str> {
    EXPENSE_UTBMS
        .captures(description)
        .and_then(|caps| caps.name("code"))
        .map(|m| m.as_str())
}

/// The `##X123-Y456` task and activity pair embedded in an adjustment
/// or discount description.
pub fn task_and_activity(description: &str) -> Option<(&str, &str)> {
    let caps = TASK_AND_ACTIVITY.captures(description)?;
    match (caps.name("task"), caps.name("activity")) {
        (Some(task), Some(activity)) => Some((task.as_str(), activity.as_str())),
        _ => None,
    }
}

/// The pieces of a standard item description, borrowed from the input.
#[derive(Debug, PartialEq, Eq)]
pub struct DescriptionFields<'a> {
    pub our_matter: &'a str,
    pub our_client: &'a str,
    /// Override matter id after a `##` inside the parenthesised matter.
    pub client_matter: Option<&'a str>,
    pub timekeeper: &'a str,
    pub month: &'a str,
    pub day: &'a str,
    pub year: &'a str,
    pub narrative: &'a str,
    /// Trailing `##`-prefixed UTBMS token, when one was written.
    pub utbms: Option<&'a str>,
}

pub fn parse_description(description: &str) -> Option<DescriptionFields<'_>> {
    let caps = DESCRIPTION.captures(description)?;
    let field = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

    Some(DescriptionFields {
        our_matter: field("our_matter"),
        our_client: field("our_client"),
        client_matter: caps.name("client_matter").map(|m| m.as_str()),
        timekeeper: field("timekeeper"),
        month: field("month"),
        day: field("day"),
        year: field("year"),
        narrative: field("narrative"),
        utbms: caps.name("utbms").map(|m| m.as_str()),
    })
}

/// Splits a UTBMS token on its first hyphen. An activity half selects
/// fee classification; its absence selects expense classification.
pub fn split_utbms(token: &str) -> Option<(&str, Option<&str>)> {
    let caps = GENERAL_UTBMS.captures(token)?;
    let expense_or_task = caps.name("expense_or_task")?.as_str();
    Some((expense_or_task, caps.name("activity").map(|m| m.as_str())))
}

/// Collapses every run of whitespace to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

pub fn word_count(text: &str) -> usize {
    WHITESPACE.split(text).count()
}

/// First word or phrase in the narrative that reviewers tend to reject.
pub fn find_buzzword(narrative: &str) -> Option<&str> {
    BUZZWORD.find(narrative).map(|m| m.as_str())
}

/// First token in the narrative shaped like a patent number.
pub fn find_patent_number(narrative: &str) -> Option<&str> {
    PATENT_NUMBER.find(narrative).map(|m| m.as_str())
}

pub fn mentions_flat_fee(narrative: &str) -> bool {
    FLAT_FEE.is_match(narrative)
}
