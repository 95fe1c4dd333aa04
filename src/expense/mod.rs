//! Expense management for the expense tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the fixed list of categories
//! - Database functions for storing, querying, and managing expenses
//! - The filter, aggregation and CSV export of a set of expenses
//! - View handlers for expense-related web pages

mod charts;
mod core;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod expenses_page;
mod export;
mod filter;
mod form;
mod query;
mod summary;
mod view;

pub use core::{Category, Expense, NewExpense};
pub use create_endpoint::create_expense_endpoint;
pub use db::{create_expense, create_expense_table, delete_expense, get_expense, update_expense};
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::update_expense_endpoint;
pub use edit_page::get_edit_expense_page;
pub use expenses_page::get_expenses_page;
pub use export::export_expenses_endpoint;
pub use filter::{ExpenseFilter, FilterQuery};
pub use form::ExpenseForm;
pub use summary::ExpenseSummary;

#[cfg(test)]
pub use db::count_expenses;
