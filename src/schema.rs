use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One spreadsheet row keyed by header name.
pub type Row = BTreeMap<String, String>;

/// A parsed upload. Built once per file and never mutated afterwards; a new
/// upload replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedTable {
    headers: Vec<String>,
    rows: Vec<Row>,
    source_name: String,
}

impl UploadedTable {
    pub fn new(headers: Vec<String>, rows: Vec<Row>, source_name: impl Into<String>) -> Self {
        Self {
            headers,
            rows,
            source_name: source_name.into(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// Spending bucket assigned by keyword heuristics. `Other` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Salary,
    Rent,
    Groceries,
    Food,
    Transport,
    Utilities,
    Entertainment,
    Healthcare,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Salary,
        Category::Rent,
        Category::Groceries,
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Rent => "Rent",
            Self::Groceries => "Groceries",
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalized income or expense record derived from one table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// 1-based position of the source row, assigned before filtering.
    pub id: usize,
    pub category: Category,
    pub description: String,
    /// Always strictly positive.
    pub amount: f64,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}
