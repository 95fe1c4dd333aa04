//! Defines the endpoint for creating a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that tolerates missing fields instead of
// rejecting the request like axum::Form.
use axum_extra::extract::{Form, PrivateCookieJar};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{ExpenseForm, create_expense},
    flash::{FlashMessage, set_flash},
    timezone::local_today,
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new expense.
///
/// Always redirects to the expenses page with a flash message saying whether
/// the expense was saved. Nothing is saved if the form is invalid.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let new_expense = match form.validate(today) {
        Ok(new_expense) => new_expense,
        Err(error) => {
            tracing::warn!("Rejected new expense {form:?}: {error}");
            let jar = set_flash(jar, FlashMessage::error(error.to_string()));
            return (jar, Redirect::to(endpoints::ROOT)).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_expense(new_expense, &connection) {
        Ok(expense) => {
            tracing::info!("Created expense {}", expense.id);
            let jar = set_flash(jar, FlashMessage::success("Expense added."));
            (jar, Redirect::to(endpoints::ROOT)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not create expense: {error}");
            error.into_response()
        }
    }
}
