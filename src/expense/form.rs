//! The form for creating and editing expenses.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    expense::{
        Category, NewExpense,
        core::{ISO_DATE_FORMAT, MAX_DESCRIPTION_CHARS},
    },
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The form data for creating or editing an expense.
///
/// Every field is kept as the raw text the client sent, so that missing and
/// malformed values can be reported to the user instead of rejected by the
/// extractor.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExpenseForm {
    /// Text describing what the money was spent on.
    #[serde(default)]
    pub description: String,
    /// The amount spent in dollars.
    #[serde(default)]
    pub amount: String,
    /// The date the money was spent as "YYYY-MM-DD".
    #[serde(default)]
    pub date: String,
    /// One of the fixed category labels.
    #[serde(default)]
    pub category: String,
}

impl ExpenseForm {
    /// Check the form and convert it into a [NewExpense].
    ///
    /// The checks run in order and the first failure is returned:
    /// 1. description, amount and category must not be blank,
    /// 2. the amount must be a finite number greater than zero,
    /// 3. the description must be at most [MAX_DESCRIPTION_CHARS] characters,
    /// 4. the category must be one of [Category::ALL].
    ///
    /// A date that is blank or not "YYYY-MM-DD" is replaced with `default_date`.
    ///
    /// # Errors
    /// Returns [Error::MissingRequiredFields], [Error::InvalidAmount],
    /// [Error::DescriptionTooLong] or [Error::InvalidCategory].
    pub fn validate(&self, default_date: Date) -> Result<NewExpense, Error> {
        let description = self.description.trim();
        let amount = self.amount.trim();
        let category = self.category.trim();

        if description.is_empty() || amount.is_empty() || category.is_empty() {
            return Err(Error::MissingRequiredFields);
        }

        let amount = parse_amount(amount)?;

        let description_length = description.chars().count();
        if description_length > MAX_DESCRIPTION_CHARS {
            return Err(Error::DescriptionTooLong(description_length));
        }

        let category: Category = category.parse()?;

        let date = Date::parse(self.date.trim(), ISO_DATE_FORMAT).unwrap_or(default_date);

        Ok(NewExpense {
            description: description.to_owned(),
            amount,
            category: category.to_string(),
            date,
        })
    }
}

fn parse_amount(text: &str) -> Result<f64, Error> {
    match text.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(Error::InvalidAmount(text.to_owned())),
    }
}

/// The values the form fields are filled in with.
pub struct ExpenseFormDefaults<'a> {
    pub description: Option<&'a str>,
    pub amount: Option<f64>,
    pub date: Date,
    pub category: Option<&'a str>,
}

pub fn expense_form_fields(defaults: &ExpenseFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));
    let has_unlisted_category = defaults
        .category
        .is_some_and(|category| category.parse::<Category>().is_err());

    html! {
        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Coffee"
                maxlength=(MAX_DESCRIPTION_CHARS)
                required
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.01"
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[defaults.category.is_none()] { "Select a category" }

                @if has_unlisted_category {
                    @if let Some(category) = defaults.category {
                        option value=(category) selected { (category) }
                    }
                }

                @for category in Category::ALL {
                    option
                        value=(category.as_str())
                        selected[defaults.category == Some(category.as_str())]
                    {
                        (category.as_str())
                    }
                }
            }
        }
    }
}
