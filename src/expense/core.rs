//! Defines the core data models for expenses.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, database_id::ExpenseId};

/// The format dates are entered in, displayed in and exported as, e.g. "2024-01-05".
pub(crate) const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The maximum number of characters in an expense description.
pub const MAX_DESCRIPTION_CHARS: usize = 120;

// ============================================================================
// MODELS
// ============================================================================

/// Money that was spent on something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent, always greater than zero.
    pub amount: f64,
    /// The category of the expense, e.g. "Food".
    pub category: String,
    /// When the money was spent.
    pub date: Date,
}

/// The fields of an expense that has not been saved yet.
///
/// Values should come from [crate::expense::ExpenseForm::validate] or another
/// source that upholds the same invariants: a trimmed, non-empty description
/// of at most [MAX_DESCRIPTION_CHARS] characters, an amount greater than zero
/// and a non-empty category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The category of the expense.
    pub category: String,
    /// When the money was spent.
    pub date: Date,
}

impl NewExpense {
    /// Create a new expense in one of the fixed categories.
    pub fn new(description: &str, amount: f64, category: Category, date: Date) -> Self {
        Self {
            description: description.to_owned(),
            amount,
            category: category.to_string(),
            date,
        }
    }
}

/// The fixed set of categories an expense can be entered with.
///
/// The category is stored as text, so expenses in the database are not
/// limited to these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Groceries, restaurants, coffee.
    Food,
    /// Public transport, fuel, taxis.
    Transportation,
    /// Rent or mortgage payments.
    Rent,
    /// Power, water, internet and other bills.
    UtilitiesBills,
    /// Movies, games, events.
    Entertainment,
    /// Doctors, pharmacy, gym.
    Health,
}

impl Category {
    /// Every category, in the order they are shown to the user.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transportation,
        Category::Rent,
        Category::UtilitiesBills,
        Category::Entertainment,
        Category::Health,
    ];

    /// The label the category is displayed and stored as.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Rent => "Rent",
            Category::UtilitiesBills => "Utilities/Bills",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();

        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
            .ok_or_else(|| Error::InvalidCategory(label.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
