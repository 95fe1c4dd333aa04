//! Alert system for displaying success, warning and error messages to users.
//!
//! Alerts are rendered either inline at the top of a page, or as a fragment
//! that HTMX swaps into the `#alert-container` element of the base layout.

use maud::{Markup, html};

/// A message to show the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation succeeded.
    SuccessSimple {
        /// The headline.
        message: String,
    },
    /// Something the user should know about that is not an error, e.g. a filter was ignored.
    Warning {
        /// The headline.
        message: String,
        /// More detail about what happened.
        details: String,
    },
    /// The operation failed.
    Error {
        /// The headline.
        message: String,
        /// More detail about what went wrong and how to fix it.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, String::new()),
            Alert::Warning { message, details } => (WARNING_STYLE, message, details),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
        };

        html! {
            div
                role="alert"
                class={ "p-4 mb-4 text-sm rounded-lg border " (container_style) }
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    span class="block mt-1" { (details) }
                }
            }
        }
    }
}

const SUCCESS_STYLE: &str = "text-green-800 bg-green-50 border-green-300 \
    dark:bg-gray-800 dark:text-green-400 dark:border-green-800";
const WARNING_STYLE: &str = "text-yellow-800 bg-yellow-50 border-yellow-300 \
    dark:bg-gray-800 dark:text-yellow-300 dark:border-yellow-800";
const ERROR_STYLE: &str = "text-red-800 bg-red-50 border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";
