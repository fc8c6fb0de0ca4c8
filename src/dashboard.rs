use crate::schema::{Category, Transaction, TransactionType};
use serde::{Deserialize, Serialize};

/// How many expense categories the breakdown keeps.
pub const TOP_CATEGORY_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub value: f64,
    /// Share of total expense, 0–100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expense: f64,
    /// Income minus expense; negative when overspent.
    pub savings: f64,
    pub income_count: usize,
    pub expense_count: usize,
    pub top_categories: Vec<CategoryTotal>,
    /// True when the figures come from [`sample_transactions`] rather than an upload.
    pub is_sample: bool,
}

impl DashboardSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        let mut income_count = 0;
        let mut expense_count = 0;
        // first-appearance order, so equal totals keep input order after the stable sort
        let mut by_category: Vec<(Category, f64)> = Vec::new();

        for txn in transactions {
            match txn.kind {
                TransactionType::Income => {
                    total_income += txn.amount;
                    income_count += 1;
                }
                TransactionType::Expense => {
                    total_expense += txn.amount;
                    expense_count += 1;
                    match by_category.iter_mut().find(|(c, _)| *c == txn.category) {
                        Some((_, total)) => *total += txn.amount,
                        None => by_category.push((txn.category, txn.amount)),
                    }
                }
            }
        }

        by_category.sort_by(|a, b| b.1.total_cmp(&a.1));
        by_category.truncate(TOP_CATEGORY_LIMIT);

        let top_categories = by_category
            .into_iter()
            .map(|(category, value)| CategoryTotal {
                category,
                value,
                percentage: if total_expense > 0.0 {
                    value / total_expense * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            total_income,
            total_expense,
            savings: total_income - total_expense,
            income_count,
            expense_count,
            top_categories,
            is_sample: false,
        }
    }

    /// Summarizes the uploaded transactions, or the sample set when there are none.
    pub fn for_display(transactions: &[Transaction]) -> Self {
        if transactions.is_empty() {
            let mut summary = Self::from_transactions(&sample_transactions());
            summary.is_sample = true;
            summary
        } else {
            Self::from_transactions(transactions)
        }
    }
}

fn sample(
    id: usize,
    category: Category,
    description: &str,
    amount: f64,
    date: &str,
    kind: TransactionType,
) -> Transaction {
    Transaction {
        id,
        category,
        description: description.to_string(),
        amount,
        date: date.to_string(),
        kind,
    }
}

/// Preview data shown before anything is uploaded.
pub fn sample_transactions() -> Vec<Transaction> {
    use Category::*;
    use TransactionType::{Expense, Income};

    vec![
        sample(1, Salary, "Monthly Salary", 75000.0, "Dec 1", Income),
        sample(2, Groceries, "Big Bazaar", 2450.0, "Dec 3", Expense),
        sample(3, Food, "Starbucks", 580.0, "Dec 5", Expense),
        sample(4, Transport, "Uber Rides", 1200.0, "Dec 7", Expense),
        sample(5, Rent, "Monthly Rent", 25000.0, "Dec 10", Expense),
        sample(6, Utilities, "Electricity Bill", 2800.0, "Dec 12", Expense),
        sample(7, Entertainment, "Netflix Subscription", 649.0, "Dec 14", Expense),
        sample(8, Food, "Zomato Order", 890.0, "Dec 15", Expense),
        sample(9, Healthcare, "Pharmacy", 1250.0, "Dec 17", Expense),
        sample(10, Transport, "Petrol", 3500.0, "Dec 19", Expense),
        sample(11, Groceries, "DMart", 3200.0, "Dec 21", Expense),
        sample(12, Food, "Restaurant", 2100.0, "Dec 22", Expense),
    ]
}
