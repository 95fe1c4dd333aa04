//! Export of a filtered set of expenses as a CSV file download.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::Writer;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{
        Expense, FilterQuery,
        query::{SortOrder, get_expenses},
    },
};

const CSV_HEADER: [&str; 4] = ["date", "description", "category", "amount"];

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportExpensesState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the filtered expenses as a CSV attachment.
///
/// Takes the same filter parameters as the expenses page. Expenses are
/// written oldest first.
pub async fn export_expenses_endpoint(
    State(state): State<ExportExpensesState>,
    query: FilterQuery,
) -> Response {
    let resolved = query.resolve();

    let expenses = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("Could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_expenses(&resolved.filter, SortOrder::Ascending, &connection) {
            Ok(expenses) => expenses,
            Err(error) => {
                tracing::error!("Could not get expenses for export: {error}");
                return error.into_response();
            }
        }
    };

    let body = match write_expenses_csv(&expenses) {
        Ok(body) => body,
        Err(error) => return error.into_response(),
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(&resolved.query)
    );

    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// Write `expenses` as CSV with a header row.
///
/// Dates are written as "YYYY-MM-DD" and amounts with exactly two decimal
/// places. Fields containing commas, quotes or newlines are quoted.
///
/// # Errors
/// Returns [Error::CsvExport] if a record cannot be written.
pub(crate) fn write_expenses_csv(expenses: &[Expense]) -> Result<String, Error> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for expense in expenses {
        writer
            .write_record([
                expense.date.to_string(),
                expense.description.clone(),
                expense.category.clone(),
                format!("{:.2}", expense.amount),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| csv_error(error.error()))?;

    String::from_utf8(bytes).map_err(|error| {
        tracing::error!("CSV export is not valid UTF-8: {error}");
        Error::CsvExport(error.to_string())
    })
}

fn csv_error(error: impl std::fmt::Display) -> Error {
    tracing::error!("Could not write CSV: {error}");
    Error::CsvExport(error.to_string())
}

/// The name of the exported file, e.g. "expenses_2024-01-01_to_all.csv".
///
/// Uses the date range as the user typed it, or "all" for a missing bound.
pub(crate) fn export_filename(query: &FilterQuery) -> String {
    let bound = |value: &Option<String>| match value.as_deref() {
        Some(value) if !value.trim().is_empty() => sanitize_filename(value),
        _ => "all".to_owned(),
    };

    format!(
        "expenses_{}_to_{}.csv",
        bound(&query.start),
        bound(&query.end)
    )
}

/// Replace characters that cannot appear in a quoted header filename with '_'.
fn sanitize_filename(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect()
}
