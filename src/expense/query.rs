//! Database queries for filtered sets of expenses.

use rusqlite::{Connection, ToSql};

use crate::{
    Error,
    expense::{Expense, ExpenseFilter, db::map_expense_row},
};

/// The order to sort expenses in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortOrder {
    /// Oldest first, ties broken by the lowest ID.
    Ascending,
    /// Newest first, ties broken by the highest ID.
    Descending,
}

/// Get the expenses that satisfy every constraint in `filter`.
///
/// Date bounds are inclusive and the category must match exactly.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped to an [Expense].
pub(crate) fn get_expenses(
    filter: &ExpenseFilter,
    sort_order: SortOrder,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let mut conditions = Vec::new();
    let mut params: Vec<(&str, &dyn ToSql)> = Vec::new();

    if let Some(start_date) = &filter.start_date {
        conditions.push("date >= :start_date");
        params.push((":start_date", start_date as &dyn ToSql));
    }

    if let Some(end_date) = &filter.end_date {
        conditions.push("date <= :end_date");
        params.push((":end_date", end_date as &dyn ToSql));
    }

    if let Some(category) = &filter.category {
        conditions.push("category = :category");
        params.push((":category", category as &dyn ToSql));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let order_clause = match sort_order {
        SortOrder::Ascending => "ORDER BY date ASC, id ASC",
        SortOrder::Descending => "ORDER BY date DESC, id DESC",
    };

    let query = format!(
        "SELECT id, description, amount, category, date FROM expense {where_clause} {order_clause}"
    );

    connection
        .prepare(&query)?
        .query_map(params.as_slice(), map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        db::initialize,
        expense::{Category, Expense, ExpenseFilter, NewExpense, create_expense},
    };

    use super::{SortOrder, get_expenses};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create(description: &str, category: Category, date: Date, conn: &Connection) -> Expense {
        create_expense(NewExpense::new(description, 1.0, category, date), conn)
            .expect("Could not create test expense")
    }

    fn ids(expenses: &[Expense]) -> Vec<i64> {
        expenses.iter().map(|expense| expense.id).collect()
    }

    #[test]
    fn no_constraints_returns_everything() {
        let conn = get_test_connection();
        create("Coffee", Category::Food, date!(2024 - 01 - 05), &conn);
        create("Bus", Category::Transportation, date!(2024 - 01 - 06), &conn);

        let got = get_expenses(&ExpenseFilter::default(), SortOrder::Descending, &conn).unwrap();

        assert_eq!(got.len(), 2);
    }

    #[test]
    fn empty_table_returns_nothing() {
        let conn = get_test_connection();

        let got = get_expenses(&ExpenseFilter::default(), SortOrder::Ascending, &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let conn = get_test_connection();
        let before = create("Before", Category::Food, date!(2024 - 01 - 04), &conn);
        let first = create("First", Category::Food, date!(2024 - 01 - 05), &conn);
        let last = create("Last", Category::Food, date!(2024 - 01 - 07), &conn);
        let after = create("After", Category::Food, date!(2024 - 01 - 08), &conn);
        let filter = ExpenseFilter {
            start_date: Some(date!(2024 - 01 - 05)),
            end_date: Some(date!(2024 - 01 - 07)),
            category: None,
        };

        let got = get_expenses(&filter, SortOrder::Ascending, &conn).unwrap();

        assert_eq!(ids(&got), vec![first.id, last.id]);
        assert!(!got.contains(&before));
        assert!(!got.contains(&after));
    }

    #[test]
    fn start_date_only() {
        let conn = get_test_connection();
        create("Old", Category::Food, date!(2023 - 12 - 31), &conn);
        let new = create("New", Category::Food, date!(2024 - 01 - 01), &conn);
        let filter = ExpenseFilter {
            start_date: Some(date!(2024 - 01 - 01)),
            ..Default::default()
        };

        let got = get_expenses(&filter, SortOrder::Ascending, &conn).unwrap();

        assert_eq!(got, vec![new]);
    }

    #[test]
    fn end_date_only() {
        let conn = get_test_connection();
        let old = create("Old", Category::Food, date!(2023 - 12 - 31), &conn);
        create("New", Category::Food, date!(2024 - 01 - 01), &conn);
        let filter = ExpenseFilter {
            end_date: Some(date!(2023 - 12 - 31)),
            ..Default::default()
        };

        let got = get_expenses(&filter, SortOrder::Ascending, &conn).unwrap();

        assert_eq!(got, vec![old]);
    }

    #[test]
    fn category_is_exact_match() {
        let conn = get_test_connection();
        let food = create("Coffee", Category::Food, date!(2024 - 01 - 05), &conn);
        create("Bus", Category::Transportation, date!(2024 - 01 - 05), &conn);
        create_expense(
            NewExpense {
                description: "Snack".to_owned(),
                amount: 1.0,
                category: "food".to_owned(),
                date: date!(2024 - 01 - 05),
            },
            &conn,
        )
        .unwrap();
        let filter = ExpenseFilter {
            category: Some("Food".to_owned()),
            ..Default::default()
        };

        let got = get_expenses(&filter, SortOrder::Descending, &conn).unwrap();

        assert_eq!(got, vec![food]);
    }

    #[test]
    fn combines_constraints_with_and() {
        let conn = get_test_connection();
        create("Early food", Category::Food, date!(2024 - 01 - 01), &conn);
        let want = create("Food", Category::Food, date!(2024 - 01 - 10), &conn);
        create("Bus", Category::Transportation, date!(2024 - 01 - 10), &conn);
        let filter = ExpenseFilter {
            start_date: Some(date!(2024 - 01 - 05)),
            end_date: Some(date!(2024 - 01 - 31)),
            category: Some("Food".to_owned()),
        };

        let got = get_expenses(&filter, SortOrder::Descending, &conn).unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn descending_orders_by_date_then_id() {
        let conn = get_test_connection();
        let a = create("A", Category::Food, date!(2024 - 01 - 05), &conn);
        let b = create("B", Category::Food, date!(2024 - 01 - 06), &conn);
        let c = create("C", Category::Food, date!(2024 - 01 - 05), &conn);

        let got = get_expenses(&ExpenseFilter::default(), SortOrder::Descending, &conn).unwrap();

        assert_eq!(ids(&got), vec![b.id, c.id, a.id]);
    }

    #[test]
    fn ascending_orders_by_date_then_id() {
        let conn = get_test_connection();
        let a = create("A", Category::Food, date!(2024 - 01 - 05), &conn);
        let b = create("B", Category::Food, date!(2024 - 01 - 06), &conn);
        let c = create("C", Category::Food, date!(2024 - 01 - 05), &conn);

        let got = get_expenses(&ExpenseFilter::default(), SortOrder::Ascending, &conn).unwrap();

        assert_eq!(ids(&got), vec![a.id, c.id, b.id]);
    }
}
