//! Aggregation of a filtered set of expenses into a total and breakdowns by
//! category and by day.
//!
//! Sums are accumulated at full precision and only rounded to cents in the
//! output.

use std::collections::BTreeMap;

use time::Date;

use crate::expense::Expense;

/// The summed amount of the expenses in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of the amounts, rounded to cents.
    pub amount: f64,
}

/// The summed amounts of expenses per day as parallel sequences for charting.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DailyTotals {
    /// Dates formatted as "YYYY-MM-DD", ascending.
    pub labels: Vec<String>,
    /// The sum of the amounts on the date with the same index in `labels`, rounded to cents.
    pub values: Vec<f64>,
}

/// The total and breakdowns of a set of expenses.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpenseSummary {
    /// The sum of every amount, rounded to cents.
    pub total: f64,
    /// One entry per category present in the set, ordered by label.
    pub by_category: Vec<CategoryTotal>,
    /// One entry per date present in the set, ordered by date.
    pub by_day: DailyTotals,
}

impl ExpenseSummary {
    /// Summarize `expenses`. The order of `expenses` does not matter.
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        Self {
            total: round_to_cents(expenses.iter().map(|expense| expense.amount).sum()),
            by_category: sum_by_category(expenses),
            by_day: sum_by_day(expenses),
        }
    }
}

/// Round `amount` to two decimal places.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Sums expense amounts by category.
///
/// # Returns
/// One [CategoryTotal] per distinct category, ordered by category label.
fn sum_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_owned(),
            amount: round_to_cents(amount),
        })
        .collect()
}

/// Sums expense amounts by date.
///
/// # Returns
/// Date labels and totals in chronological order. Dates without expenses are left out.
fn sum_by_day(expenses: &[Expense]) -> DailyTotals {
    let mut totals: BTreeMap<Date, f64> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.date).or_insert(0.0) += expense.amount;
    }

    let mut daily_totals = DailyTotals {
        labels: Vec::with_capacity(totals.len()),
        values: Vec::with_capacity(totals.len()),
    };

    for (date, amount) in totals {
        daily_totals.labels.push(date.to_string());
        daily_totals.values.push(round_to_cents(amount));
    }

    daily_totals
}
