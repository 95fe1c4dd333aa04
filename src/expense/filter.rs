//! Turns the raw filter query parameters into the constraints used by the
//! expenses page and the CSV export.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{alert::Alert, expense::core::ISO_DATE_FORMAT};

const US_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[month]-[day]-[year]");

/// The filter query parameters exactly as the client sent them.
///
/// The raw strings are kept so the filter form can be shown with what the
/// user typed and the export filename can reuse them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FilterQuery {
    /// The first date to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// The last date to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// The category an expense must have.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// The constraints an expense must satisfy to be included in a result set.
///
/// A `None` field places no constraint on expenses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only include expenses on or after this date.
    pub start_date: Option<Date>,
    /// Only include expenses on or before this date.
    pub end_date: Option<Date>,
    /// Only include expenses with exactly this category.
    pub category: Option<String>,
}

/// Why a filter was not applied as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterWarning {
    /// The end date is before the start date, so every constraint was dropped.
    EndBeforeStart {
        /// The parsed start date.
        start: Date,
        /// The parsed end date.
        end: Date,
    },
}

impl FilterWarning {
    pub(crate) fn into_alert(self) -> Alert {
        match self {
            FilterWarning::EndBeforeStart { start, end } => Alert::Warning {
                message: "Filters cleared".to_owned(),
                details: format!(
                    "The end date {end} is before the start date {start}, \
                    so all expenses are shown."
                ),
            },
        }
    }
}

/// The outcome of normalizing a [FilterQuery].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilter {
    /// The constraints to apply.
    pub filter: ExpenseFilter,
    /// The raw query that is in effect. Cleared when the filter was discarded.
    pub query: FilterQuery,
    /// Set when the filter was discarded.
    pub warning: Option<FilterWarning>,
}

impl FilterQuery {
    /// Parse the raw query parameters into an [ExpenseFilter].
    ///
    /// Empty or unparsable values place no constraint on expenses. If both
    /// dates parse and the end date is before the start date, the whole
    /// filter is discarded and a warning is returned with the empty filter.
    pub fn resolve(&self) -> ResolvedFilter {
        let start_date = self.start.as_deref().and_then(parse_filter_date);
        let end_date = self.end.as_deref().and_then(parse_filter_date);

        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return discard_filter(start, end);
        }

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_owned);

        ResolvedFilter {
            filter: ExpenseFilter {
                start_date,
                end_date,
                category,
            },
            query: self.clone(),
            warning: None,
        }
    }
}

impl FilterQuery {
    /// Read the filter parameters from a URL query string, e.g.
    /// "start=2024-01-01&category=Food".
    ///
    /// Only the first value of a repeated parameter is used, other parameters
    /// are ignored, and a malformed query string gives the empty filter.
    pub fn from_query_string(query: &str) -> Self {
        let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
            Ok(pairs) => pairs,
            Err(error) => {
                tracing::warn!("Ignoring malformed filter query {query:?}: {error}");
                return Self::default();
            }
        };

        let mut filter_query = Self::default();

        for (key, value) in pairs {
            let field = match key.as_str() {
                "start" => &mut filter_query.start,
                "end" => &mut filter_query.end,
                "category" => &mut filter_query.category,
                _ => continue,
            };

            if field.is_none() {
                *field = Some(value);
            }
        }

        filter_query
    }
}

impl<S> FromRequestParts<S> for FilterQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .uri
            .query()
            .map(Self::from_query_string)
            .unwrap_or_default())
    }
}

fn discard_filter(start: Date, end: Date) -> ResolvedFilter {
    tracing::warn!("Discarding filter with end date {end} before start date {start}");

    ResolvedFilter {
        filter: ExpenseFilter::default(),
        query: FilterQuery::default(),
        warning: Some(FilterWarning::EndBeforeStart { start, end }),
    }
}

impl FilterQuery {
    /// The query as a URL query string without the leading '?', e.g.
    /// "start=2024-01-01&category=Food".
    ///
    /// Empty parameters are left out.
    pub fn to_query_string(&self) -> String {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|value| !value.trim().is_empty())
                .map(str::to_owned)
        };

        let query = FilterQuery {
            start: non_empty(&self.start),
            end: non_empty(&self.end),
            category: non_empty(&self.category),
        };

        serde_urlencoded::to_string(&query).unwrap_or_else(|error| {
            tracing::error!("Could not encode filter query {query:?}: {error}");
            String::new()
        })
    }

    /// Append the query string to `path`, e.g. "/export.csv?category=Food".
    pub fn url_for(&self, path: &str) -> String {
        let query_string = self.to_query_string();

        if query_string.is_empty() {
            path.to_owned()
        } else {
            format!("{path}?{query_string}")
        }
    }
}

/// Parse a date from a filter parameter.
///
/// Accepts "YYYY-MM-DD" and, failing that, "MM-DD-YYYY". Surrounding
/// whitespace is ignored.
pub fn parse_filter_date(text: &str) -> Option<Date> {
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    Date::parse(text, ISO_DATE_FORMAT)
        .or_else(|_| Date::parse(text, US_DATE_FORMAT))
        .ok()
}




#[cfg(test)]
mod from_query_string_tests {
    use super::FilterQuery;

    #[test]
    fn reads_filter_parameters() {
        let got = FilterQuery::from_query_string("start=2024-01-01&end=01-31-2024&category=Food");

        assert_eq!(
            got,
            FilterQuery {
                start: Some("2024-01-01".to_owned()),
                end: Some("01-31-2024".to_owned()),
                category: Some("Food".to_owned()),
            }
        );
    }

    #[test]
    fn decodes_percent_encoding() {
        let got = FilterQuery::from_query_string("category=Utilities%2FBills");

        assert_eq!(got.category.as_deref(), Some("Utilities/Bills"));
    }

    #[test]
    fn repeated_parameter_keeps_first_value() {
        let got = FilterQuery::from_query_string(
            "start=2024-01-01&start=2024-02-01&category=Food&category=Rent",
        );

        assert_eq!(got.start.as_deref(), Some("2024-01-01"));
        assert_eq!(got.category.as_deref(), Some("Food"));
        assert_eq!(got.end, None);
    }

    #[test]
    fn ignores_unknown_parameters() {
        let got = FilterQuery::from_query_string("page=2&category=Food");

        assert_eq!(got.category.as_deref(), Some("Food"));
        assert_eq!(got.start, None);
    }

    #[test]
    fn empty_query_is_empty_filter() {
        assert_eq!(FilterQuery::from_query_string(""), FilterQuery::default());
    }
}
