//! Turns an arbitrary [`UploadedTable`] into canonical [`Transaction`]s.
//!
//! Every field has a defined fallback, so normalization never fails: a row
//! that yields no usable amount is dropped, everything else is kept.

use crate::categorizer::categorize;
use crate::schema::{Row, Transaction, TransactionType, UploadedTable};
use crate::utils::{
    contains_any, find_header, parse_loose_date, parse_money, short_month_day, take_chars,
    truncate_utf16,
};
use log::debug;

pub const DESCRIPTION_MAX_UNITS: usize = 50;
pub const UNKNOWN: &str = "Unknown";

const TYPE_KEYWORDS: &[&str] = &["type"];
const CREDIT_KEYWORDS: &[&str] = &["credit"];
const DEBIT_KEYWORDS: &[&str] = &["debit"];
const DESCRIPTION_KEYWORDS: &[&str] = &["description", "narration", "particular"];
const AMOUNT_KEYWORDS: &[&str] = &["amount", "value", "total"];
const DATE_KEYWORDS: &[&str] = &["date", "time"];

const INCOME_TYPE_VALUES: &[&str] = &["income", "credit"];
const EXPENSE_TYPE_VALUES: &[&str] = &["expense", "debit"];
const INCOME_DESCRIPTION_HINTS: &[&str] = &["salary", "credit", "received", "income"];

/// The headers the heuristics care about, resolved once per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub type_col: Option<String>,
    pub credit_col: Option<String>,
    pub debit_col: Option<String>,
    pub description_col: Option<String>,
    pub amount_col: Option<String>,
    pub date_col: Option<String>,
}

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> Self {
        let pick = |keywords: &[&str]| find_header(headers, keywords).map(str::to_string);
        Self {
            type_col: pick(TYPE_KEYWORDS),
            credit_col: pick(CREDIT_KEYWORDS),
            debit_col: pick(DEBIT_KEYWORDS),
            description_col: pick(DESCRIPTION_KEYWORDS),
            amount_col: pick(AMOUNT_KEYWORDS),
            date_col: pick(DATE_KEYWORDS),
        }
    }
}

/// A row paired with the resolved columns. Lookups return `None` for absent
/// columns and empty cells alike.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    pub row: &'a Row,
    pub columns: &'a ColumnMap,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a Row, columns: &'a ColumnMap) -> Self {
        Self { row, columns }
    }

    fn cell(&self, column: &Option<String>) -> Option<&'a str> {
        let name = column.as_deref()?;
        self.row
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn type_value(&self) -> Option<&'a str> {
        self.cell(&self.columns.type_col)
    }

    pub fn credit(&self) -> Option<&'a str> {
        self.cell(&self.columns.credit_col)
    }

    pub fn debit(&self) -> Option<&'a str> {
        self.cell(&self.columns.debit_col)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.cell(&self.columns.description_col)
    }

    pub fn amount(&self) -> Option<&'a str> {
        self.cell(&self.columns.amount_col)
    }

    pub fn date(&self) -> Option<&'a str> {
        self.cell(&self.columns.date_col)
    }
}

fn positive(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_money).filter(|v| *v > 0.0)
}

pub type TypeRule = fn(&RowView<'_>) -> Option<TransactionType>;

fn explicit_type_column(view: &RowView<'_>) -> Option<TransactionType> {
    let value = view.type_value()?;
    if contains_any(value, INCOME_TYPE_VALUES) {
        Some(TransactionType::Income)
    } else if contains_any(value, EXPENSE_TYPE_VALUES) {
        Some(TransactionType::Expense)
    } else {
        None
    }
}

fn positive_credit(view: &RowView<'_>) -> Option<TransactionType> {
    positive(view.credit()).map(|_| TransactionType::Income)
}

fn positive_debit(view: &RowView<'_>) -> Option<TransactionType> {
    positive(view.debit()).map(|_| TransactionType::Expense)
}

fn description_hint(view: &RowView<'_>) -> Option<TransactionType> {
    view.description()
        .filter(|d| contains_any(d, INCOME_DESCRIPTION_HINTS))
        .map(|_| TransactionType::Income)
}

/// Evaluated in order; the first rule that decides wins. Rows no rule decides
/// are expenses.
pub const TYPE_RULES: &[(&str, TypeRule)] = &[
    ("type column", explicit_type_column),
    ("credit column", positive_credit),
    ("debit column", positive_debit),
    ("description keywords", description_hint),
];

pub fn detect_type(view: &RowView<'_>) -> TransactionType {
    TYPE_RULES
        .iter()
        .find_map(|(_, rule)| rule(view))
        .unwrap_or(TransactionType::Expense)
}

/// Absolute amount for the row, or `0.0` when nothing parses.
pub fn extract_amount(view: &RowView<'_>, kind: TransactionType) -> f64 {
    let preferred = match kind {
        TransactionType::Income => positive(view.credit()),
        TransactionType::Expense => positive(view.debit()),
    };

    preferred
        .or_else(|| view.amount().and_then(parse_money))
        .map(f64::abs)
        .unwrap_or(0.0)
}

pub fn extract_date(view: &RowView<'_>) -> String {
    match view.date() {
        Some(raw) => parse_loose_date(raw)
            .map(short_month_day)
            .unwrap_or_else(|| take_chars(raw, 10)),
        None => UNKNOWN.to_string(),
    }
}

pub fn extract_description<'a>(view: &RowView<'a>) -> &'a str {
    view.description().unwrap_or(UNKNOWN)
}

/// Normalizes a single row. `id` is the row's 1-based position. Returns
/// `None` when the row carries no positive amount.
pub fn normalize_row(view: &RowView<'_>, id: usize) -> Option<Transaction> {
    let kind = detect_type(view);
    let amount = extract_amount(view, kind);
    if amount <= 0.0 {
        return None;
    }

    let description = extract_description(view);

    Some(Transaction {
        id,
        category: categorize(description),
        description: truncate_utf16(description, DESCRIPTION_MAX_UNITS),
        amount,
        date: extract_date(view),
        kind,
    })
}

/// Pure: the same table always produces the same transactions.
pub fn normalize(table: &UploadedTable) -> Vec<Transaction> {
    let columns = ColumnMap::resolve(table.headers());
    debug!("Resolved columns for {}: {:?}", table.source_name(), columns);

    let transactions: Vec<Transaction> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(index, row)| normalize_row(&RowView::new(row, &columns), index + 1))
        .collect();

    debug!(
        "Normalized {} of {} rows from {}",
        transactions.len(),
        table.len(),
        table.source_name()
    );

    transactions
}
