//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The store-assigned ID of an expense.
pub type ExpenseId = DatabaseId;
