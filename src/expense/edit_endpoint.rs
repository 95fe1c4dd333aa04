use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    endpoints,
    expense::{ExpenseForm, get_expense, update_expense},
    flash::{FlashMessage, set_flash},
};

/// The state needed to update an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the HTMX edit form.
///
/// On success, sets a flash message and tells HTMX to redirect to the
/// expenses page. Otherwise responds with an alert: 400 for an invalid form,
/// 404 if the expense does not exist.
///
/// A blank or malformed date keeps the expense's current date.
pub async fn update_expense_endpoint(
    State(state): State<UpdateExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let current_expense = match get_expense(expense_id, &connection) {
        Ok(expense) => expense,
        Err(Error::NotFound) => {
            tracing::warn!("Tried to update missing expense {expense_id}");
            return Error::UpdateMissingExpense.into_alert_response();
        }
        Err(error) => {
            tracing::error!("Could not get expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };

    let new_expense = match form.validate(current_expense.date) {
        Ok(new_expense) => new_expense,
        Err(error) => {
            tracing::warn!("Rejected update to expense {expense_id} {form:?}: {error}");
            return error.into_alert_response();
        }
    };

    match update_expense(expense_id, new_expense, &connection) {
        Ok(_) => {
            tracing::info!("Updated expense {expense_id}");
            let jar = set_flash(jar, FlashMessage::success("Expense updated."));
            (
                jar,
                HxRedirect(endpoints::ROOT.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::{Form, PrivateCookieJar};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        app_state::create_cookie_key,
        db::initialize,
        expense::{Category, Expense, ExpenseForm, NewExpense, create_expense, get_expense},
        test_utils::{
            assert_hx_redirect, assert_valid_html, get_flash_cookie, parse_html_fragment,
        },
    };

    use super::{UpdateExpenseState, update_expense_endpoint};

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    fn get_state_with_expense() -> (UpdateExpenseState, Expense) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let expense = create_expense(
            NewExpense::new("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
            &conn,
        )
        .unwrap();

        (
            UpdateExpenseState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            expense,
        )
    }

    fn form(description: &str, amount: &str, date: &str, category: &str) -> ExpenseForm {
        ExpenseForm {
            description: description.to_owned(),
            amount: amount.to_owned(),
            date: date.to_owned(),
            category: category.to_owned(),
        }
    }

    #[tokio::test]
    async fn can_update_expense() {
        let (state, expense) = get_state_with_expense();
        let want = Expense {
            id: expense.id,
            description: "Movie".to_owned(),
            amount: 15.0,
            category: "Entertainment".to_owned(),
            date: date!(2024 - 01 - 07),
        };

        let response = update_expense_endpoint(
            State(state.clone()),
            Path(expense.id),
            get_jar(),
            Form(form("Movie", "15", "2024-01-07", "Entertainment")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/");
        assert!(get_flash_cookie(&response).is_some());
        let got = get_expense(expense.id, &state.db_connection.lock().unwrap());
        assert_eq!(got, Ok(want));
    }

    #[tokio::test]
    async fn blank_date_keeps_current_date() {
        let (state, expense) = get_state_with_expense();

        update_expense_endpoint(
            State(state.clone()),
            Path(expense.id),
            get_jar(),
            Form(form("Tea", "3", "", "Food")),
        )
        .await;

        let got = get_expense(expense.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.date, expense.date);
        assert_eq!(got.description, "Tea");
    }

    #[tokio::test]
    async fn invalid_form_is_bad_request() {
        let (state, expense) = get_state_with_expense();

        let response = update_expense_endpoint(
            State(state.clone()),
            Path(expense.id),
            get_jar(),
            Form(form("Coffee", "-5", "2024-01-05", "Food")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let got = get_expense(expense.id, &state.db_connection.lock().unwrap());
        assert_eq!(got, Ok(expense));
    }

    #[tokio::test]
    async fn missing_expense_is_not_found() {
        let (state, _) = get_state_with_expense();

        let response = update_expense_endpoint(
            State(state),
            Path(42),
            get_jar(),
            Form(form("Movie", "15", "2024-01-07", "Entertainment")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
