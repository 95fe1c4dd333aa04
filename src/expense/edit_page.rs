use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    endpoints::{self, format_endpoint},
    expense::{
        Expense,
        form::{ExpenseFormDefaults, expense_form_fields},
        get_expense,
    },
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
};

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing an expense.
///
/// Responds with the 404 page if the expense does not exist.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let expense = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        get_expense(expense_id, &connection).inspect_err(|error| {
            if *error != Error::NotFound {
                tracing::error!("Failed to retrieve expense {expense_id}: {error}");
            }
        })?
    };

    Ok(edit_expense_view(&expense).into_response())
}

fn edit_expense_view(expense: &Expense) -> Markup {
    let update_endpoint = format_endpoint(endpoints::EDIT_EXPENSE, expense.id);
    let defaults = ExpenseFormDefaults {
        description: Some(&expense.description),
        amount: Some(expense.amount),
        date: expense.date,
        category: Some(&expense.category),
    };

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Edit expense" }

            form
                hx-post=(update_endpoint)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                (expense_form_fields(&defaults))

                button
                    type="submit"
                    id="submit-button"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                    "Save changes"
                }
            }

            a
                href=(endpoints::ROOT)
                class={ "mt-4 text-center " (BUTTON_SECONDARY_STYLE) }
            {
                "Cancel"
            }
        }
    };

    base("Edit Expense", &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        endpoints::{self, format_endpoint},
        expense::{Category, NewExpense, create_expense},
        test_utils::{
            assert_content_type, assert_form_input_with_value, assert_form_select_value,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{EditExpensePageState, get_edit_expense_page};

    fn get_state() -> EditExpensePageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        EditExpensePageState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn renders_form_with_current_values() {
        let state = get_state();
        let expense = create_expense(
            NewExpense::new("Bus", 2.0, Category::Transportation, date!(2024 - 01 - 06)),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_edit_expense_page(State(state), Path(expense.id))
            .await
            .expect("Could not render edit page");

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::EDIT_EXPENSE, expense.id),
            "hx-post",
        );
        assert_form_input_with_value(&form, "description", "text", "Bus");
        assert_form_input_with_value(&form, "amount", "number", "2.00");
        assert_form_input_with_value(&form, "date", "date", "2024-01-06");
        assert_form_select_value(&form, "category", "Transportation");
        assert_form_submit_button_with_text(&form, "Save changes");
    }

    #[tokio::test]
    async fn missing_expense_is_not_found() {
        let result = get_edit_expense_page(State(get_state()), Path(42)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn missing_expense_renders_404_page() {
        use axum::response::IntoResponse;

        let response = get_edit_expense_page(State(get_state()), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
