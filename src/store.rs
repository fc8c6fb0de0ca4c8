use crate::dashboard::DashboardSummary;
use crate::error::Result;
use crate::ingestion::load_table;
use crate::normalizer::normalize;
use crate::notice::Notice;
use crate::schema::{Transaction, UploadedTable};
use log::{info, warn};
use std::cell::OnceCell;
use std::path::Path;
use std::sync::Arc;

/// How many transactions go into the chat context block.
pub const CONTEXT_TRANSACTION_LIMIT: usize = 10;

/// Owns the last uploaded table and everything derived from it.
///
/// Created once at start-up and handed to whatever needs it. The table is
/// replaced wholesale by [`FinanceStore::load`] and removed by
/// [`FinanceStore::clear`]; transactions are recomputed on every change and
/// the dashboard summary is cached until the next one.
#[derive(Debug, Default)]
pub struct FinanceStore {
    table: Option<Arc<UploadedTable>>,
    transactions: Arc<Vec<Transaction>>,
    generation: u64,
    summary: OnceCell<DashboardSummary>,
}

impl FinanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&UploadedTable> {
        self.table.as_deref()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Shared handle to the current transaction list, for consumers that
    /// outlive a borrow of the store.
    pub fn transactions_handle(&self) -> Arc<Vec<Transaction>> {
        Arc::clone(&self.transactions)
    }

    /// Bumped on every load and clear.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_data(&self) -> bool {
        self.table.is_some()
    }

    /// Replaces the current table and re-derives transactions.
    pub fn load(&mut self, table: UploadedTable) -> &[Transaction] {
        let transactions = normalize(&table);
        info!(
            "Loaded {} ({} rows, {} transactions)",
            table.source_name(),
            table.len(),
            transactions.len()
        );
        self.table = Some(Arc::new(table));
        self.transactions = Arc::new(transactions);
        self.invalidate();
        &self.transactions
    }

    /// Reads and loads a CSV file. On any error the store is left untouched
    /// and the error is returned for the caller to surface.
    pub fn upload(&mut self, path: &Path) -> Result<Notice> {
        let table = load_table(path).inspect_err(|e| {
            warn!("Upload of {} failed: {}", path.display(), e);
        })?;
        let notice = Notice::info(
            "File uploaded successfully",
            format!("Loaded {} transactions from {}", table.len(), table.source_name()),
        );
        self.load(table);
        Ok(notice)
    }

    pub fn clear(&mut self) -> Notice {
        if let Some(table) = self.table.take() {
            info!("Cleared data from {}", table.source_name());
        }
        self.transactions = Arc::new(Vec::new());
        self.invalidate();
        Notice::info("Data cleared", "Your expense data has been removed.")
    }

    /// Dashboard figures for the current data, computed at most once per
    /// generation. Falls back to the sample set when nothing is loaded.
    pub fn summary(&self) -> &DashboardSummary {
        self.summary
            .get_or_init(|| DashboardSummary::for_display(&self.transactions))
    }

    /// Plain-text lines describing the first transactions, for prompting.
    pub fn context_lines(&self, limit: usize) -> Vec<String> {
        context_lines(&self.transactions, limit)
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.summary = OnceCell::new();
    }
}

pub fn context_lines(transactions: &[Transaction], limit: usize) -> Vec<String> {
    transactions
        .iter()
        .take(limit)
        .map(|t| {
            let verb = if t.is_income() { "received" } else { "spent" };
            format!(
                "On {}, {} ₹{} on {} under {}",
                t.date, verb, t.amount, t.description, t.category
            )
        })
        .collect()
}
