use finance_buddy::*;
use std::error::Error;
use std::path::PathBuf;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut store = FinanceStore::new();
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let notice = store.upload(&path).map_err(|e| {
                let notice = e.notice();
                format!("{}: {}", notice.title, notice.description)
            })?;
            println!("✅ {}: {}\n", notice.title, notice.description);
        }
        None => println!("No CSV given, showing the sample dashboard.\n"),
    }

    let summary = store.summary();
    println!("📊 Dashboard{}", if summary.is_sample { " (sample data)" } else { "" });
    println!("------------------------------------------------------------------");
    println!(
        "Income:   ₹{:>12.2}  ({} transactions)",
        summary.total_income, summary.income_count
    );
    println!(
        "Expenses: ₹{:>12.2}  ({} transactions)",
        summary.total_expense, summary.expense_count
    );
    println!("Savings:  ₹{:>12.2}\n", summary.savings);

    println!("Top spending categories:");
    for entry in &summary.top_categories {
        println!(
            "  {:<14} ₹{:>10.2}  {:>5.1}%",
            entry.category.name(),
            entry.value,
            entry.percentage
        );
    }

    if store.has_data() {
        println!("\nFirst transactions:");
        for line in store.context_lines(CONTEXT_TRANSACTION_LIMIT) {
            println!("  {}", line);
        }
    }

    let tracker = GoalTracker::with_sample_goals();
    println!("\n🎯 Savings goals");
    println!("------------------------------------------------------------------");
    for goal in tracker.goals() {
        println!(
            "  {:<16} ₹{:>9.0} / ₹{:<9.0} {:>5.1}%  {}",
            goal.name,
            goal.saved_amount,
            goal.target_amount,
            goal.progress_percent(),
            goal.status().label()
        );
    }
    let totals = tracker.totals();
    println!(
        "  {:<16} ₹{:>9.0} / ₹{:<9.0} {:>5.1}%",
        "Total",
        totals.saved,
        totals.target,
        totals.progress_percent()
    );

    Ok(())
}
