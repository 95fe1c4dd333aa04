//! The expenses page: the filtered list with totals, breakdowns and charts.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{
        ExpenseSummary, FilterQuery,
        query::{SortOrder, get_expenses},
        view::{ExpensesViewModel, expenses_view},
    },
    flash::take_flash,
    timezone::local_today,
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the expenses that match the filter in the query string, newest first.
///
/// Shows a warning and every expense if the end date is before the start
/// date. A pending flash message is shown once and removed from the cookie jar.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    jar: PrivateCookieJar,
    query: FilterQuery,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let resolved = query.resolve();

    let expenses = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        get_expenses(&resolved.filter, SortOrder::Descending, &connection).inspect_err(
            |error| tracing::error!("Could not get expenses for {:?}: {error}", resolved.filter),
        )?
    };

    let summary = ExpenseSummary::from_expenses(&expenses);

    let (jar, flash) = take_flash(jar);
    let alerts = flash
        .map(|flash| flash.into_alert())
        .into_iter()
        .chain(resolved.warning.map(|warning| warning.into_alert()))
        .collect();

    let markup = expenses_view(ExpensesViewModel {
        expenses: &expenses,
        summary: &summary,
        query: &resolved.query,
        alerts,
        today,
    });

    Ok((jar, markup).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::PrivateCookieJar;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        app_state::create_cookie_key,
        db::initialize,
        expense::{Category, FilterQuery, NewExpense, create_expense},
        flash::{FlashMessage, set_flash},
        test_utils::{
            assert_content_type, assert_valid_html, get_flash_cookie, jar_with_cookie,
            parse_html_document,
        },
    };

    use super::{ExpensesPageState, get_expenses_page};

    fn get_state() -> ExpensesPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_expense(
            NewExpense::new("Coffee", 4.5, Category::Food, date!(2024 - 01 - 05)),
            &conn,
        )
        .unwrap();
        create_expense(
            NewExpense::new("Bus", 2.0, Category::Transportation, date!(2024 - 01 - 06)),
            &conn,
        )
        .unwrap();

        ExpensesPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    fn query(start: Option<&str>, end: Option<&str>, category: Option<&str>) -> FilterQuery {
        FilterQuery {
            start: start.map(str::to_owned),
            end: end.map(str::to_owned),
            category: category.map(str::to_owned),
        }
    }

    fn row_descriptions(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("tr[data-expense-row] td[data-column=description]").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    fn total(html: &Html) -> String {
        html.select(&Selector::parse("#expenses-total").unwrap())
            .next()
            .expect("No total")
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    fn alert_count(html: &Html) -> usize {
        html.select(&Selector::parse("div[role=alert]").unwrap()).count()
    }

    #[tokio::test]
    async fn lists_every_expense_newest_first() {
        let response = get_expenses_page(State(get_state()), get_jar(), query(None, None, None))
            .await
            .expect("Could not render expenses page");

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(row_descriptions(&html), vec!["Bus", "Coffee"]);
        assert_eq!(total(&html), "$6.50");
        assert_eq!(alert_count(&html), 0);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let response = get_expenses_page(
            State(get_state()),
            get_jar(),
            query(None, None, Some("Food")),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(row_descriptions(&html), vec!["Coffee"]);
        assert_eq!(total(&html), "$4.50");
    }

    #[tokio::test]
    async fn filters_by_date_range() {
        let response = get_expenses_page(
            State(get_state()),
            get_jar(),
            query(Some("01-06-2024"), Some("2024-01-31"), None),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(row_descriptions(&html), vec!["Bus"]);
        assert_eq!(total(&html), "$2.00");
    }

    #[tokio::test]
    async fn end_before_start_shows_everything_with_warning() {
        let response = get_expenses_page(
            State(get_state()),
            get_jar(),
            query(Some("2024-01-06"), Some("2024-01-05"), Some("Food")),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(row_descriptions(&html), vec!["Bus", "Coffee"]);
        assert_eq!(total(&html), "$6.50");
        assert_eq!(alert_count(&html), 1);
    }

    #[tokio::test]
    async fn shows_and_clears_flash_message() {
        let flash_cookie = get_flash_cookie(
            &(set_flash(get_jar(), FlashMessage::success("Expense added.")), ()).into_response(),
        )
        .expect("Could not set flash cookie");
        let jar = jar_with_cookie(&flash_cookie, "foobar");

        let response = get_expenses_page(State(get_state()), jar, query(None, None, None))
            .await
            .unwrap();

        let removal_cookie = get_flash_cookie(&response).expect("Flash cookie should be removed");
        assert!(removal_cookie.contains("Max-Age=0"));
        let html = parse_html_document(response).await;
        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No flash alert");
        assert!(alert.text().collect::<String>().contains("Expense added."));
    }
}
