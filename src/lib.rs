//! # Finance Buddy
//!
//! Core of a personal-finance assistant: turns arbitrary bank-statement CSVs
//! into typed transactions, summarizes them for a dashboard, tracks savings
//! goals, and streams answers from a chat backend.
//!
//! ## Core Concepts
//!
//! - **Uploaded table**: the raw CSV as header-keyed rows, kept as parsed
//! - **Normalization**: column detection by header keywords, type and amount
//!   heuristics, keyword categorization into nine fixed categories
//! - **Store**: owns the current upload and re-derives transactions and the
//!   dashboard summary whenever it changes
//! - **Chat session**: an explicit `Idle → Sending → Streaming` state machine
//!   fed by an incremental event-stream decoder
//!
//! ## Example
//!
//! ```rust,ignore
//! use finance_buddy::*;
//!
//! let table = read_table_from_str(
//!     "Date,Description,Amount\n2024-12-15,Zomato Order,₹890\n",
//!     "december.csv",
//! )?;
//!
//! let mut store = FinanceStore::new();
//! store.load(table);
//!
//! let summary = store.summary();
//! assert_eq!(summary.total_expense, 890.0);
//! assert_eq!(summary.top_categories[0].category, Category::Food);
//! ```

pub mod categorizer;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod goals;
pub mod ingestion;
pub mod normalizer;
pub mod notice;
pub mod schema;
pub mod store;
pub mod utils;

#[cfg(feature = "proxy")]
pub mod proxy;

pub use categorizer::{categorize, CategoryRule, CATEGORY_RULES};
pub use chat::{ChatMessage, ChatSession, ChatState, EventStreamDecoder, Role};
#[cfg(feature = "client")]
pub use chat::ChatClient;
pub use config::{ClientConfig, ProxyConfig};
pub use dashboard::{sample_transactions, CategoryTotal, DashboardSummary, TOP_CATEGORY_LIMIT};
pub use error::{FinanceBuddyError, Result};
pub use goals::{GoalStatus, GoalTotals, GoalTracker, NewGoal, SavingsGoal};
pub use ingestion::{ensure_csv_name, load_table, read_table, read_table_from_str};
pub use normalizer::{normalize, ColumnMap};
pub use notice::{Notice, Severity};
pub use schema::*;
pub use store::{FinanceStore, CONTEXT_TRANSACTION_LIMIT};

use log::info;
use std::path::Path;

/// Reads a CSV file and returns its dashboard figures in one step.
///
/// An empty or fully filtered file yields the sample summary, flagged with
/// `is_sample`.
pub fn dashboard_from_csv(path: &Path) -> Result<DashboardSummary> {
    let table = load_table(path)?;
    let transactions = normalize(&table);
    info!(
        "Summarizing {} transactions from {}",
        transactions.len(),
        table.source_name()
    );
    Ok(DashboardSummary::for_display(&transactions))
}
