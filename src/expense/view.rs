//! HTML for the expenses page.

use maud::{Markup, html};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    alert::Alert,
    endpoints::{self, format_endpoint},
    expense::{
        Category, Expense, ExpenseSummary, FilterQuery,
        charts::{charts_script, charts_view, expense_charts},
        form::{ExpenseFormDefaults, expense_form_fields},
        summary::{CategoryTotal, DailyTotals},
    },
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles,
        format_currency, link,
    },
};

/// The max number of graphemes to display in the expense table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 40;

/// Everything the expenses page displays.
pub(crate) struct ExpensesViewModel<'a> {
    /// The filtered expenses, newest first.
    pub expenses: &'a [Expense],
    pub summary: &'a ExpenseSummary,
    /// The filter in effect, as the user typed it.
    pub query: &'a FilterQuery,
    /// Alerts to show above the expenses, e.g. flash messages.
    pub alerts: Vec<Alert>,
    /// The default date for the add expense form.
    pub today: Date,
}

pub(crate) fn expenses_view(model: ExpensesViewModel<'_>) -> Markup {
    let charts = expense_charts(model.summary);
    let export_url = model.query.url_for(endpoints::EXPORT_CSV);

    let mut head_elements = vec![dollar_input_styles()];
    if !charts.is_empty() {
        head_elements.push(HeadElement::ScriptLink(
            "/static/echarts.6.0.0.min.js".to_owned(),
        ));
        head_elements.push(charts_script(&charts));
    }

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a
                        href=(export_url)
                        id="export-link"
                        class=(LINK_STYLE)
                    {
                        "Export CSV"
                    }
                }

                @for alert in model.alerts {
                    (alert.into_html())
                }

                (add_expense_form_view(model.today))

                (filter_form_view(model.query))

                (totals_view(model.summary))

                @if !charts.is_empty() {
                    (charts_view(&charts))
                }

                (expenses_table_view(model.expenses))
            }
        }
    };

    base("Expenses", &head_elements, &content)
}

fn add_expense_form_view(today: Date) -> Markup {
    let defaults = ExpenseFormDefaults {
        description: None,
        amount: None,
        date: today,
        category: None,
    };

    html! {
        section class="rounded bg-white dark:bg-gray-800 p-4"
        {
            h2 class="mb-4 text-lg font-semibold" { "Add expense" }

            form
                id="add-expense-form"
                method="post"
                action=(endpoints::ADD_EXPENSE)
                class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                (expense_form_fields(&defaults))

                div class="md:col-span-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add expense" }
                }
            }
        }
    }
}

fn filter_form_view(query: &FilterQuery) -> Markup {
    let selected_category = query.category.as_deref().unwrap_or_default();

    html! {
        section class="rounded bg-white dark:bg-gray-800 p-4"
        {
            h2 class="mb-4 text-lg font-semibold" { "Filter" }

            form
                id="filter-form"
                method="get"
                action=(endpoints::ROOT)
                class="grid grid-cols-1 md:grid-cols-4 gap-4 items-end"
            {
                div
                {
                    label for="start" class=(FORM_LABEL_STYLE) { "From" }
                    input
                        name="start"
                        id="start"
                        type="text"
                        placeholder="YYYY-MM-DD"
                        value=[query.start.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end" class=(FORM_LABEL_STYLE) { "To" }
                    input
                        name="end"
                        id="end"
                        type="text"
                        placeholder="YYYY-MM-DD"
                        value=[query.end.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                    select
                        name="category"
                        id="filter-category"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[selected_category.is_empty()] { "All categories" }

                        @for category in Category::ALL {
                            option
                                value=(category.as_str())
                                selected[selected_category == category.as_str()]
                            {
                                (category.as_str())
                            }
                        }
                    }
                }

                div class="flex gap-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
                    a href=(endpoints::ROOT) class={ "text-center " (BUTTON_SECONDARY_STYLE) }
                    {
                        "Clear"
                    }
                }
            }
        }
    }
}

fn totals_view(summary: &ExpenseSummary) -> Markup {
    html! {
        section class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            div class="rounded bg-white dark:bg-gray-800 p-4"
            {
                h2 class="text-lg font-semibold" { "Total" }
                p id="expenses-total" class="text-3xl font-bold tabular-nums"
                {
                    (format_currency(summary.total))
                }
            }

            div class="rounded bg-white dark:bg-gray-800 p-4"
            {
                h2 class="mb-2 text-lg font-semibold" { "By category" }
                (category_breakdown_view(&summary.by_category))
            }

            div class="rounded bg-white dark:bg-gray-800 p-4"
            {
                h2 class="mb-2 text-lg font-semibold" { "By day" }
                (daily_breakdown_view(&summary.by_day))
            }
        }
    }
}

fn daily_breakdown_view(totals: &DailyTotals) -> Markup {
    html! {
        table id="daily-breakdown" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            tbody
            {
                @for (date, amount) in totals.labels.iter().zip(&totals.values) {
                    tr data-daily-total=(date)
                    {
                        td class="py-1" { (date) }
                        td class="py-1 text-right tabular-nums" { (format_currency(*amount)) }
                    }
                }

                @if totals.labels.is_empty() {
                    tr { td colspan="2" class="py-1" { "Nothing spent yet." } }
                }
            }
        }
    }
}

fn category_breakdown_view(totals: &[CategoryTotal]) -> Markup {
    html! {
        table id="category-breakdown" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            tbody
            {
                @for total in totals {
                    tr data-category-total=(total.category)
                    {
                        td class="py-1" { span class=(CATEGORY_BADGE_STYLE) { (total.category) } }
                        td class="py-1 text-right tabular-nums" { (format_currency(total.amount)) }
                    }
                }

                @if totals.is_empty() {
                    tr { td colspan="2" class="py-1" { "Nothing spent yet." } }
                }
            }
        }
    }
}

fn expenses_table_view(expenses: &[Expense]) -> Markup {
    html! {
        section class="rounded bg-white dark:bg-gray-800 overflow-x-auto"
        {
            table
                id="expenses-table"
                class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        (expense_row_view(expense))
                    }

                    @if expenses.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                data-empty-state="true"
                                class="px-6 py-4 text-center"
                            {
                                "No expenses found."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_row_view(expense: &Expense) -> Markup {
    let (description, tooltip) = format_description(&expense.description);
    let edit_url = format_endpoint(endpoints::EDIT_EXPENSE, expense.id);
    let delete_url = format_endpoint(endpoints::DELETE_EXPENSE, expense.id);
    let confirm_message = format!(
        "Are you sure you want to delete the expense \"{}\"? This cannot be undone.",
        expense.description
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-row=(expense.id)
        {
            td class=(TABLE_CELL_STYLE) data-column="date"
            {
                time datetime=(expense.date) { (expense.date) }
            }
            td class=(TABLE_CELL_STYLE) data-column="description" title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE) data-column="category"
            {
                span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
            }
            td class="px-6 py-4 text-right tabular-nums" data-column="amount"
            {
                (format_currency(expense.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (link(&edit_url, "Edit"))

                    form
                        method="post"
                        action=(delete_url)
                        data-confirm=(confirm_message)
                        onsubmit="return confirm(this.dataset.confirm)"
                    {
                        button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                    }
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}
